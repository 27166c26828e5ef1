// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::gateway::traits::IdentityResolver;
use tracing::warn;

/// 解析评论者ID
///
/// 纯数字ID直接使用；否则交给身份解析器，解析不到或出错时回退为原始ID
pub async fn resolve_actor_id(resolver: &dyn IdentityResolver, raw_id: &str) -> String {
    if is_numeric_id(raw_id) {
        return raw_id.to_string();
    }

    match resolver.resolve(raw_id).await {
        Ok(Some(resolved)) if !resolved.trim().is_empty() => resolved,
        Ok(_) => raw_id.to_string(),
        Err(e) => {
            warn!(actor = raw_id, error = %e, "Identity resolution failed, using raw id");
            raw_id.to_string()
        }
    }
}

fn is_numeric_id(raw_id: &str) -> bool {
    !raw_id.is_empty() && raw_id.bytes().all(|b| b.is_ascii_digit())
}
