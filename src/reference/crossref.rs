//! # Crossref 文献查询
//!
//! 通过 `GET {base_url}/works/{doi}` 获取文献元数据并格式化为：
//! ```text
//! Title, A Author, and B Author, Short Journal, v. 12, pp. 1-10, (2002).
//! ```
//! 无卷号时为 `Title, Authors, Journal, pp.1-10, (2002).`
//!
//! ## 失败策略
//! - 每次请求带超时
//! - 网络错误、429 与 5xx 按固定间隔重试有限次
//! - 其余失败（404、JSON 结构不符等）直接返回 `None`
//!
//! ## 依赖关系
//! - 被 `reference/mod.rs` 导出
//! - 使用 `reqwest` 阻塞客户端、`serde_json` 与 `chrono`

use crate::error::{PowderError, Result};
use crate::reference::{Reference, ReferenceResolver};

use chrono::NaiveDate;
use serde_json::Value;
use std::thread;
use std::time::Duration;

/// 查询配置
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// API 根地址
    pub base_url: String,
    /// 单次请求超时
    pub timeout: Duration,
    /// 失败后的最大重试次数
    pub retries: u32,
    /// 重试间隔
    pub retry_delay: Duration,
    /// 联系邮箱（Crossref polite pool）
    pub mailto: Option<String>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.crossref.org".to_string(),
            timeout: Duration::from_secs(10),
            retries: 2,
            retry_delay: Duration::from_millis(500),
            mailto: None,
        }
    }
}

/// Crossref 查询器
pub struct CrossrefResolver {
    client: reqwest::blocking::Client,
    config: LookupConfig,
}

impl CrossrefResolver {
    /// 创建查询器
    pub fn new(config: LookupConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("powder-match/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PowderError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// 获取 Crossref 返回的 `message` 对象
    fn fetch_message(&self, doi: &str) -> Option<Value> {
        let url = format!(
            "{}/works/{}",
            self.config.base_url.trim_end_matches('/'),
            doi.trim()
        );

        for attempt in 0..=self.config.retries {
            if attempt > 0 {
                thread::sleep(self.config.retry_delay);
            }

            let mut request = self.client.get(&url);
            if let Some(mailto) = &self.config.mailto {
                request = request.query(&[("mailto", mailto.as_str())]);
            }

            let response = match request.send() {
                Ok(r) => r,
                Err(e) => {
                    tracing::debug!(doi, attempt, error = %e, "crossref request failed");
                    continue;
                }
            };

            let status = response.status();
            if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                tracing::debug!(doi, attempt, %status, "crossref busy, retrying");
                continue;
            }
            if !status.is_success() {
                tracing::warn!(doi, %status, "crossref lookup failed");
                return None;
            }

            return match response.json::<Value>() {
                Ok(mut body) => body.get_mut("message").map(Value::take),
                Err(e) => {
                    tracing::warn!(doi, error = %e, "crossref returned unreadable JSON");
                    None
                }
            };
        }

        tracing::warn!(doi, "crossref lookup gave up after retries");
        None
    }
}

impl ReferenceResolver for CrossrefResolver {
    fn resolve(&self, id: &str) -> Option<Reference> {
        let message = self.fetch_message(id)?;
        let reference = format_crossref_message(&message);
        if reference.is_none() {
            tracing::warn!(doi = id, "crossref record lacks title, authors or journal");
        }
        reference
    }
}

/// 第一个字符串元素
fn first_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key)?.as_array()?.first()?.as_str()
}

/// 字符串或数字字段
fn text_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 作者列表 "Given Family"，多位作者时末位前加 "and"
fn format_authors(message: &Value) -> Option<String> {
    let mut authors: Vec<String> = message
        .get("author")?
        .as_array()?
        .iter()
        .filter_map(|a| {
            let given = a.get("given").and_then(Value::as_str).map(str::trim);
            let family = a.get("family").and_then(Value::as_str).map(str::trim);
            match (given, family) {
                (Some(g), Some(f)) => Some(format!("{} {}", g, f)),
                (None, Some(f)) => Some(f.to_string()),
                _ => a.get("name").and_then(Value::as_str).map(|n| n.trim().to_string()),
            }
        })
        .collect();

    if authors.is_empty() {
        return None;
    }
    if authors.len() > 1 {
        let last = authors.len() - 1;
        authors[last] = format!("and {}", authors[last]);
    }

    Some(authors.join(", "))
}

/// 发表日期，缺少的月/日取 6
fn issued_date(message: &Value) -> Option<(i32, NaiveDate)> {
    let parts = message
        .get("issued")?
        .get("date-parts")?
        .as_array()?
        .first()?
        .as_array()?;

    let mut numbers = parts.iter().map(Value::as_i64);
    let year = numbers.next().flatten()? as i32;
    let month = numbers.next().flatten().unwrap_or(6) as u32;
    let day = numbers.next().flatten().unwrap_or(6) as u32;

    Some((year, NaiveDate::from_ymd_opt(year, month, day)?))
}

/// 将 Crossref `message` 格式化为参考文献
pub fn format_crossref_message(message: &Value) -> Option<Reference> {
    let title = first_str(message, "title")?;
    let authors = format_authors(message)?;
    let journal =
        first_str(message, "short-container-title").or_else(|| first_str(message, "container-title"))?;
    let page = text_field(message, "page").unwrap_or_else(|| "n/a".to_string());

    let issued = issued_date(message);
    let year = issued
        .map(|(y, _)| y.to_string())
        .unwrap_or_else(|| "n.d.".to_string());

    let citation = match text_field(message, "volume") {
        Some(volume) => format!(
            "{}, {}, {}, v. {}, pp. {}, ({}).",
            title, authors, journal, volume, page, year
        ),
        None => format!("{}, {}, {}, pp.{}, ({}).", title, authors, journal, page, year),
    };

    Some(Reference {
        citation,
        date: issued.map(|(_, d)| d),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_with_volume() {
        let message = json!({
            "title": ["Structure of a new phase"],
            "author": [
                {"given": " Ada ", "family": "Lovelace"},
                {"given": "Alan", "family": "Turing"},
                {"given": "Grace", "family": "Hopper"}
            ],
            "short-container-title": ["Acta Cryst B"],
            "container-title": ["Acta Crystallographica Section B"],
            "volume": "58",
            "page": "364-369",
            "issued": {"date-parts": [[2002, 5, 29]]}
        });

        let reference = format_crossref_message(&message).unwrap();
        assert_eq!(
            reference.citation,
            "Structure of a new phase, Ada Lovelace, Alan Turing, and Grace Hopper, \
             Acta Cryst B, v. 58, pp. 364-369, (2002)."
        );
        assert_eq!(reference.date, NaiveDate::from_ymd_opt(2002, 5, 29));
    }

    #[test]
    fn test_format_without_volume_and_partial_date() {
        let message = json!({
            "title": ["Powder data"],
            "author": [{"given": "Marie", "family": "Curie"}],
            "short-container-title": [],
            "container-title": ["Journal of Powder Data"],
            "page": "12",
            "issued": {"date-parts": [[1998]]}
        });

        let reference = format_crossref_message(&message).unwrap();
        assert_eq!(
            reference.citation,
            "Powder data, Marie Curie, Journal of Powder Data, pp.12, (1998)."
        );
        assert_eq!(reference.date, NaiveDate::from_ymd_opt(1998, 6, 6));
    }

    #[test]
    fn test_incomplete_record_is_none() {
        let message = json!({"title": ["No authors"], "container-title": ["J"]});
        assert!(format_crossref_message(&message).is_none());
        assert!(format_crossref_message(&Value::Null).is_none());
    }

    #[test]
    fn test_unreachable_service_degrades_to_none() {
        let config = LookupConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_millis(200),
            retries: 1,
            retry_delay: Duration::from_millis(10),
            mailto: None,
        };
        let resolver = CrossrefResolver::new(config).unwrap();
        assert!(resolver.resolve("10.1107/S0108768102003476").is_none());
    }
}
