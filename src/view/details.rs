//! Details of a single selected call.

use super::processed::ProcessedCall;
use crate::parser::{CallType, FunctionInfo, FunctionTable};
use crate::utils::time::format_timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallDetails {
    pub function_name: String,
    pub call_type: CallType,
    pub timestamp: String,
    pub function_id: u64,
    pub thread_id: u64,
    pub depth: usize,
    pub metadata: Option<FunctionInfo>,
}

/// Look up a call by chain and call index
///
/// Returns `None` when either index is out of range.
pub fn call_details(
    processed: &[Vec<ProcessedCall>],
    table: &FunctionTable,
    chain_index: usize,
    call_index: usize,
) -> Option<CallDetails> {
    let call = processed.get(chain_index)?.get(call_index)?;

    Some(CallDetails {
        function_name: call.function_name.clone(),
        call_type: call.call_type,
        timestamp: format_timestamp(call.event.timestamp),
        function_id: call.event.function_address,
        thread_id: call.event.thread_id,
        depth: call.depth,
        metadata: table.get(call.event.function_address).cloned(),
    })
}

impl CallDetails {
    /// Multi-line text rendering
    pub fn render(&self) -> String {
        let mut fields = vec![
            ("Function", self.function_name.clone()),
            ("Call type", self.call_type.to_string()),
            ("Timestamp", self.timestamp.clone()),
            ("Function ID", self.function_id.to_string()),
            ("Thread ID", self.thread_id.to_string()),
            ("Depth", self.depth.to_string()),
        ];

        if let Some(info) = &self.metadata {
            fields.push(("Kind", info.kind.clone()));
            fields.push(("Type ID", info.type_id.clone()));
            fields.push(("Linkage", info.linkage.clone()));
        }

        fields
            .into_iter()
            .map(|(label, value)| format!("{:<13}{}", format!("{}:", label), value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::CallEvent;
    use crate::view::processed::process_chains;

    #[test]
    fn test_call_details() {
        let table: FunctionTable = [(
            5,
            FunctionInfo {
                name: "dev_queue_xmit".to_string(),
                kind: "FUNC".to_string(),
                type_id: "77".to_string(),
                linkage: "global".to_string(),
            },
        )]
        .into_iter()
        .collect();
        let chains = vec![vec![CallEvent::call(1.5, 5, 42), CallEvent::ret(2.0, 6, 42)]];
        let processed = process_chains(&chains, &table);

        let details = call_details(&processed, &table, 0, 0).unwrap();
        assert_eq!(details.function_name, "dev_queue_xmit");
        assert_eq!(details.timestamp, "0:00:01.500");
        assert_eq!(details.thread_id, 42);
        assert_eq!(details.metadata.as_ref().unwrap().linkage, "global");
        assert!(details.render().contains("Linkage:     global"));

        let unknown = call_details(&processed, &table, 0, 1).unwrap();
        assert_eq!(unknown.function_name, "Unknown_6");
        assert!(unknown.metadata.is_none());
    }

    #[test]
    fn test_out_of_range() {
        let processed: Vec<Vec<ProcessedCall>> = vec![Vec::new()];
        let table = FunctionTable::new();

        assert!(call_details(&processed, &table, 0, 0).is_none());
        assert!(call_details(&processed, &table, 3, 0).is_none());
    }
}
