//! Text, call-type and thread filters over processed calls.

use super::processed::ProcessedCall;
use crate::parser::CallType;
use serde::{Deserialize, Serialize};

/// Which event kinds to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallTypeFilter {
    #[default]
    All,
    Call,
    Return,
}

impl CallTypeFilter {
    fn matches(&self, call_type: CallType) -> bool {
        match self {
            CallTypeFilter::All => true,
            CallTypeFilter::Call => call_type == CallType::Call,
            CallTypeFilter::Return => call_type == CallType::Return,
        }
    }
}

impl std::str::FromStr for CallTypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(CallTypeFilter::All),
            "call" => Ok(CallTypeFilter::Call),
            "return" => Ok(CallTypeFilter::Return),
            other => Err(format!("unknown call type '{}' (expected all, call or return)", other)),
        }
    }
}

/// Criteria a call must meet to be listed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallFilter {
    /// Case-insensitive match on the function name, or substring of the address
    pub text: Option<String>,
    pub call_type: CallTypeFilter,
    pub thread: Option<u64>,
}

/// The calls of one chain that passed a filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredChain {
    pub chain_index: usize,
    pub calls: Vec<ProcessedCall>,

    /// Number of calls in the chain before filtering
    pub original_length: usize,
}

impl CallFilter {
    pub fn is_active(&self) -> bool {
        self.text.as_deref().is_some_and(|text| !text.is_empty())
            || self.call_type != CallTypeFilter::All
            || self.thread.is_some()
    }

    pub fn matches(&self, call: &ProcessedCall) -> bool {
        if let Some(text) = self.text.as_deref().filter(|text| !text.is_empty()) {
            let name_hit = call
                .function_name
                .to_lowercase()
                .contains(&text.to_lowercase());
            let address_hit = call.event.function_address.to_string().contains(text);
            if !name_hit && !address_hit {
                return false;
            }
        }

        if !self.call_type.matches(call.call_type) {
            return false;
        }

        match self.thread {
            Some(thread) => call.event.thread_id == thread,
            None => true,
        }
    }

    /// Filter every chain, dropping chains with no remaining calls
    pub fn apply(&self, processed: &[Vec<ProcessedCall>]) -> Vec<FilteredChain> {
        processed
            .iter()
            .enumerate()
            .map(|(chain_index, chain)| FilteredChain {
                chain_index,
                calls: chain.iter().filter(|call| self.matches(call)).cloned().collect(),
                original_length: chain.len(),
            })
            .filter(|chain| !chain.calls.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{CallEvent, FunctionInfo, FunctionTable};
    use crate::view::processed::process_chains;

    fn processed() -> Vec<Vec<ProcessedCall>> {
        let table: FunctionTable = [
            (
                100,
                FunctionInfo {
                    name: "TCP_v4_rcv".to_string(),
                    ..Default::default()
                },
            ),
            (
                200,
                FunctionInfo {
                    name: "ip_output".to_string(),
                    ..Default::default()
                },
            ),
        ]
        .into_iter()
        .collect();

        let chains = vec![
            vec![
                CallEvent::call(0.0, 100, 1),
                CallEvent::call(0.1, 200, 1),
                CallEvent::ret(0.2, 200, 1),
                CallEvent::ret(0.3, 100, 1),
            ],
            vec![CallEvent::call(0.0, 200, 2), CallEvent::ret(0.1, 200, 2)],
        ];
        process_chains(&chains, &table)
    }

    #[test]
    fn test_default_filter_keeps_everything() {
        let filter = CallFilter::default();
        let filtered = filter.apply(&processed());

        assert!(!filter.is_active());
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].calls.len(), 4);
        assert_eq!(filtered[0].original_length, 4);
    }

    #[test]
    fn test_text_matches_name_case_insensitively() {
        let filter = CallFilter {
            text: Some("tcp".to_string()),
            ..Default::default()
        };
        let filtered = filter.apply(&processed());

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].calls.len(), 2);
        assert_eq!(filtered[0].original_length, 4);
    }

    #[test]
    fn test_text_matches_address() {
        let filter = CallFilter {
            text: Some("20".to_string()),
            ..Default::default()
        };
        let filtered = filter.apply(&processed());

        assert_eq!(filtered.len(), 2);
        assert!(filtered
            .iter()
            .flat_map(|c| &c.calls)
            .all(|c| c.event.function_address == 200));
    }

    #[test]
    fn test_call_type_and_thread() {
        let filter = CallFilter {
            call_type: CallTypeFilter::Return,
            thread: Some(2),
            ..Default::default()
        };
        let filtered = filter.apply(&processed());

        assert!(filter.is_active());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].chain_index, 1);
        assert_eq!(filtered[0].calls.len(), 1);
        assert_eq!(filtered[0].calls[0].call_index, 1);
    }

    #[test]
    fn test_empty_text_is_inactive() {
        let filter = CallFilter {
            text: Some(String::new()),
            ..Default::default()
        };
        assert!(!filter.is_active());
    }

    #[test]
    fn test_parse_call_type_filter() {
        assert_eq!("RETURN".parse::<CallTypeFilter>().unwrap(), CallTypeFilter::Return);
        assert!("jump".parse::<CallTypeFilter>().is_err());
    }
}
