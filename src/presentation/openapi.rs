// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::borrow::Cow;

use serde_json::{json, Map, Value};

use crate::config::settings::SchemaSettings;

pub const OPENAPI_VERSION: &str = "3.0.3";

/// 文档中使用的操作路径
///
/// 开启前缀裁剪时去掉 `schema_path_prefix`，裁剪后为空则为 `/`
pub fn operation_path<'a>(schema: &SchemaSettings, path: &'a str) -> Cow<'a, str> {
    if !schema.schema_path_prefix_trim {
        return Cow::Borrowed(path);
    }
    match path.strip_prefix(schema.schema_path_prefix.as_str()) {
        Some("") => Cow::Borrowed("/"),
        Some(rest) if rest.starts_with('/') => Cow::Borrowed(rest),
        _ => Cow::Borrowed(path),
    }
}

/// 生成 OpenAPI 文档骨架
///
/// `schema_path` 为文档端点自身的路径，`serve_include_schema` 关闭时不列出
pub fn document(schema: &SchemaSettings, paths: &[String], schema_path: &str) -> Value {
    let mut items = Map::new();
    for path in paths {
        if !schema.serve_include_schema && path == schema_path {
            continue;
        }
        let documented = operation_path(schema, path);
        let mut operation_id = documented.trim_matches('/').replace('/', "_");
        if operation_id.is_empty() {
            operation_id = "root".to_string();
        }
        items.insert(
            documented.into_owned(),
            json!({
                "get": {
                    "operationId": operation_id,
                    "responses": { "200": { "description": "" } }
                }
            }),
        );
    }

    let servers: Vec<Value> = schema
        .servers
        .iter()
        .map(|s| json!({ "url": s.url }))
        .collect();

    json!({
        "openapi": OPENAPI_VERSION,
        "info": {
            "title": schema.title,
            "description": schema.description,
            "version": schema.version.clone().unwrap_or_default(),
        },
        "servers": servers,
        "paths": items,
        "components": {},
    })
}
