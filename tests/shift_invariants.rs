// Property tests driving randomized interleavings of shift operations
// against a model of the registry, checking the per-actor invariants and
// the approved-minutes accounting.

mod common;

use std::collections::HashMap;

use chrono::{Duration, TimeZone, Utc};
use common::workflow_harness;
use duty_roster::{ActorId, Decision, ShiftError};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Op {
    Start(u8),
    End(u8),
    Cancel(u8),
    Approve(u8),
    Deny(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    (0u8..3, 0u8..5).prop_map(|(actor, kind)| match kind {
        0 => Op::Start(actor),
        1 => Op::End(actor),
        2 => Op::Cancel(actor),
        3 => Op::Approve(actor),
        _ => Op::Deny(actor),
    })
}

fn actor_name(actor: u8) -> String {
    format!("actor-{actor}")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn registry_invariants_hold_under_interleavings(
        ops in prop::collection::vec(op_strategy(), 0..40)
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async move {
            let harness = workflow_harness(vec![
                vec!["", "", "Baker", "actor-0", "", "", "0", "None"],
                vec!["", "", "Baker", "actor-1", "", "", "0", "None"],
                vec!["", "", "Baker", "actor-2", "", "", "0", "None"],
            ]);
            let approver = ActorId(999);
            let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

            // model state: start tick per active actor, pending minutes per
            // awaiting actor, total approved minutes per actor
            let mut active: HashMap<u8, i64> = HashMap::new();
            let mut awaiting: HashMap<u8, u32> = HashMap::new();
            let mut approved: HashMap<u8, u64> = HashMap::new();

            for (tick, op) in ops.iter().enumerate() {
                let now = base + Duration::minutes(tick as i64);
                match *op {
                    Op::Start(a) => {
                        let result = harness
                            .workflow
                            .on_start(ActorId(a as u64), &actor_name(a), now)
                            .await;
                        if active.contains_key(&a) {
                            prop_assert!(matches!(result, Err(ShiftError::AlreadyActive(_))));
                        } else {
                            prop_assert!(result.is_ok());
                            active.insert(a, tick as i64);
                        }
                    }
                    Op::End(a) => {
                        let result = harness.workflow.on_end(ActorId(a as u64), now).await;
                        match active.remove(&a) {
                            Some(started) => {
                                let minutes = (tick as i64 - started) as u32;
                                let shift = result.expect("end with active shift");
                                prop_assert_eq!(shift.duration_minutes, minutes);
                                awaiting.insert(a, minutes);
                            }
                            None => {
                                prop_assert!(matches!(result, Err(ShiftError::NoActiveShift(_))));
                            }
                        }
                    }
                    Op::Cancel(a) => {
                        let result = harness.workflow.on_cancel(ActorId(a as u64)).await;
                        if active.remove(&a).is_some() {
                            prop_assert!(result.is_ok());
                        } else {
                            prop_assert!(matches!(result, Err(ShiftError::NoActiveShift(_))));
                        }
                    }
                    Op::Approve(a) => {
                        let result = harness
                            .workflow
                            .on_approve(ActorId(a as u64), approver)
                            .await;
                        match awaiting.remove(&a) {
                            Some(minutes) => {
                                let total = approved.entry(a).or_default();
                                *total += u64::from(minutes);
                                prop_assert_eq!(
                                    result.expect("approve with awaiting shift"),
                                    Decision::Committed {
                                        actor: ActorId(a as u64),
                                        minutes,
                                        total_minutes: *total,
                                    }
                                );
                            }
                            None => {
                                prop_assert!(matches!(
                                    result,
                                    Err(ShiftError::NoAwaitingShift(_))
                                ));
                            }
                        }
                    }
                    Op::Deny(a) => {
                        let result = harness.workflow.on_deny(ActorId(a as u64), approver).await;
                        match awaiting.remove(&a) {
                            Some(minutes) => {
                                prop_assert_eq!(
                                    result.expect("deny with awaiting shift"),
                                    Decision::Discarded {
                                        actor: ActorId(a as u64),
                                        minutes,
                                    }
                                );
                            }
                            None => {
                                prop_assert!(matches!(
                                    result,
                                    Err(ShiftError::NoAwaitingShift(_))
                                ));
                            }
                        }
                    }
                }

                // per-actor invariant: at most one active and one awaiting
                // shift, exactly where the model says they are
                for a in 0u8..3 {
                    let registry = harness.workflow.registry();
                    prop_assert_eq!(
                        registry.get_active(ActorId(a as u64)).await.is_some(),
                        active.contains_key(&a)
                    );
                    prop_assert_eq!(
                        registry.get_awaiting(ActorId(a as u64)).await.is_some(),
                        awaiting.contains_key(&a)
                    );
                }
                prop_assert_eq!(
                    harness.workflow.registry().active_count().await,
                    active.len()
                );
                prop_assert_eq!(
                    harness.workflow.registry().awaiting_count().await,
                    awaiting.len()
                );
            }

            // the ledger holds exactly the approved minutes, nothing else
            for a in 0u8..3 {
                let row = (a + 1) as u32;
                let cell = harness.ledger.cell(row, 7).unwrap_or_default();
                let expected = approved.get(&a).copied().unwrap_or(0);
                let recorded = cell.parse::<u64>().unwrap_or(0);
                prop_assert_eq!(recorded, expected);
            }
            Ok(())
        })?;
    }
}
