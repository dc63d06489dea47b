//! Per-call listing data: names, call types and nesting depth.

use crate::parser::{CallEvent, CallType, Chain, FunctionTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A chain event enriched for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedCall {
    pub event: CallEvent,
    pub function_name: String,
    pub call_type: CallType,
    pub depth: usize,
    pub call_index: usize,
    pub chain_index: usize,
}

/// Enrich every chain of one direction
///
/// Depth is a running counter: a RETURN steps out before reporting (never
/// below 0), a CALL reports and then steps in.
pub fn process_chains(chains: &[Chain], table: &FunctionTable) -> Vec<Vec<ProcessedCall>> {
    chains
        .iter()
        .enumerate()
        .map(|(chain_index, chain)| process_chain(chain_index, chain, table))
        .collect()
}

fn process_chain(chain_index: usize, chain: &[CallEvent], table: &FunctionTable) -> Vec<ProcessedCall> {
    let mut depth = 0usize;

    chain
        .iter()
        .enumerate()
        .map(|(call_index, event)| {
            if event.is_return {
                depth = depth.saturating_sub(1);
            }
            let current = depth;
            if !event.is_return {
                depth += 1;
            }

            ProcessedCall {
                event: *event,
                function_name: table.display_name(event.function_address),
                call_type: event.call_type(),
                depth: current,
                call_index,
                chain_index,
            }
        })
        .collect()
}

/// Chain and call totals for one direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainStats {
    pub chain_count: usize,
    pub call_count: usize,
}

impl ChainStats {
    pub fn of(chains: &[Chain]) -> Self {
        Self {
            chain_count: chains.len(),
            call_count: chains.iter().map(Vec::len).sum(),
        }
    }
}

/// Distinct thread ids across processed chains, ascending
pub fn thread_ids(processed: &[Vec<ProcessedCall>]) -> Vec<u64> {
    processed
        .iter()
        .flatten()
        .map(|call| call.event.thread_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::FunctionInfo;

    #[test]
    fn test_depth_tracking() {
        let chain = vec![
            CallEvent::call(0.0, 1, 1),
            CallEvent::call(0.1, 2, 1),
            CallEvent::ret(0.2, 2, 1),
            CallEvent::ret(0.3, 1, 1),
            CallEvent::ret(0.4, 9, 1),
        ];

        let processed = process_chains(&[chain], &FunctionTable::new());
        let depths: Vec<usize> = processed[0].iter().map(|c| c.depth).collect();

        assert_eq!(depths, vec![0, 1, 1, 0, 0]);
    }

    #[test]
    fn test_names_and_indices() {
        let table: FunctionTable = [(
            1,
            FunctionInfo {
                name: "ip_rcv".to_string(),
                ..Default::default()
            },
        )]
        .into_iter()
        .collect();
        let chains = vec![vec![], vec![CallEvent::call(0.0, 1, 3), CallEvent::ret(0.1, 2, 3)]];

        let processed = process_chains(&chains, &table);

        assert!(processed[0].is_empty());
        assert_eq!(processed[1][0].function_name, "ip_rcv");
        assert_eq!(processed[1][1].function_name, "Unknown_2");
        assert_eq!(processed[1][1].call_type, CallType::Return);
        assert_eq!(processed[1][1].call_index, 1);
        assert_eq!(processed[1][1].chain_index, 1);
    }

    #[test]
    fn test_chain_stats_and_threads() {
        let chains = vec![
            vec![CallEvent::call(0.0, 1, 12), CallEvent::call(0.0, 1, 3)],
            vec![CallEvent::call(0.0, 1, 12)],
        ];

        let stats = ChainStats::of(&chains);
        assert_eq!(stats.chain_count, 2);
        assert_eq!(stats.call_count, 3);

        let processed = process_chains(&chains, &FunctionTable::new());
        assert_eq!(thread_ids(&processed), vec![3, 12]);
    }
}
