// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 从环境变量解析启动配置
pub mod config;

/// 基础设施模块
///
/// 提供数据库连接
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由和中间件
pub mod presentation;

/// 工具模块
///
/// 错误类型与日志
pub mod utils;
