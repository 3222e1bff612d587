//! JSON output formatting.

use serde::Serialize;

use balances_core::filter::PageInfo;
use balances_core::BalancesError;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// A page of results with its pagination metadata.
pub fn list_json<T: Serialize>(items: &[T], page_info: &PageInfo) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::json!({
        "items": serde_json::to_value(items)?,
        "page_info": serde_json::to_value(page_info)?,
    }))
}

/// Error envelope printed to stderr under `--json`.
pub fn failure_json(error: &BalancesError) -> serde_json::Value {
    serde_json::json!({ "error": error.to_failure() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_json_shape() {
        let info = PageInfo {
            page: 1,
            page_size: 2,
            total_count: 3,
            page_count: 2,
        };
        let value = list_json(&["a", "b"], &info).unwrap();
        assert_eq!(value["items"].as_array().unwrap().len(), 2);
        assert_eq!(value["page_info"]["total_count"], 3);
    }

    #[test]
    fn test_failure_json_carries_code() {
        let err = BalancesError::not_found("get by ID", "Vehicle");
        let value = failure_json(&err);
        assert_eq!(value["error"]["code"], "EntityNotFound");
        assert_eq!(value["error"]["entity"], "Vehicle");
    }
}
