// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 具名组件
//!
//! 中间件、已安装模块、存储后端等都以枚举表示，
//! 名称到实现的映射是一张固定的查找表，未知名称立即报错。

use serde::{Serialize, Serializer};

use crate::utils::errors::SettingsError;

/// 具名组件特质
pub trait Component: Copy + Sized + 'static {
    /// 组件类别，用于错误信息
    const KIND: &'static str;
    /// 查找表
    const ALL: &'static [Self];

    fn name(self) -> &'static str;

    /// 按名称查找组件
    fn from_name(name: &str) -> Result<Self, SettingsError> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name() == name)
            .ok_or_else(|| SettingsError::UnknownComponent {
                kind: Self::KIND,
                name: name.to_string(),
            })
    }
}

macro_rules! components {
    (
        $(
            $(#[$meta:meta])*
            $vis:vis enum $ty:ident : $kind:literal {
                $( $(#[$vmeta:meta])* $variant:ident => $name:literal ),+ $(,)?
            }
        )+
    ) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            $vis enum $ty {
                $( $(#[$vmeta])* $variant ),+
            }

            impl Component for $ty {
                const KIND: &'static str = $kind;
                const ALL: &'static [Self] = &[$($ty::$variant),+];

                fn name(self) -> &'static str {
                    match self {
                        $($ty::$variant => $name),+
                    }
                }
            }

            impl std::str::FromStr for $ty {
                type Err = SettingsError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    <$ty as Component>::from_name(s)
                }
            }

            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.serialize_str(self.name())
                }
            }
        )+
    };
}

components! {
    /// 已安装的功能模块
    pub enum InstalledApp: "installed app" {
        Admin => "admin",
        Auth => "auth",
        ContentTypes => "contenttypes",
        Sessions => "sessions",
        Messages => "messages",
        StaticFiles => "staticfiles",
        RestApi => "rest_api",
        SchemaGenerator => "schema_generator",
        YogaLevels => "yogalevels",
        YogaPoses => "yogaposes",
        Users => "users",
        YogaHistories => "yogahistories",
    }

    /// 请求处理管线中的阶段
    pub enum MiddlewareStage: "middleware stage" {
        Security => "security",
        StaticFiles => "static_files",
        Session => "session",
        Common => "common",
        Csrf => "csrf",
        Authentication => "authentication",
        Messages => "messages",
        Clickjacking => "clickjacking",
    }

    /// 模板引擎后端
    pub enum TemplateBackend: "template backend" {
        Standard => "standard",
    }

    /// 模板上下文处理器
    pub enum ContextProcessor: "context processor" {
        Debug => "debug",
        Request => "request",
        Auth => "auth",
        Messages => "messages",
    }

    /// 存储后端
    pub enum StorageBackend: "storage backend" {
        /// S3 兼容的对象存储
        S3 => "s3",
        /// 压缩并带哈希清单的静态文件存储
        CompressedManifest => "compressed_manifest",
        /// 本地文件系统
        FileSystem => "filesystem",
    }

    /// REST 接口默认认证方式
    pub enum AuthenticationClass: "authentication class" {
        Jwt => "jwt",
    }

    /// REST 接口默认权限
    pub enum PermissionClass: "permission class" {
        IsAuthenticated => "is_authenticated",
    }

    /// 文档生成所用的 schema 类
    pub enum SchemaClass: "schema class" {
        Auto => "auto",
    }
}
