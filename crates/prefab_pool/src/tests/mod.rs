//! Scenario tests exercising the full pooling surface through [`Scene`](crate::scene::Scene)

mod pooling_scenarios;
