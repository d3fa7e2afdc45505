use super::*;
use chrono::Utc;

fn result(nps: u64) -> BenchResult {
    BenchResult {
        nps,
        nodes_searched: nps * 2,
        total_time_ms: 1000,
        time: Utc::now(),
    }
}

#[test]
fn test_results_keep_insertion_order() {
    let params = BenchParams::new(1, 16, 14);
    let mut table = ResultTable::new();
    table.push(params, result(3));
    table.push(params, result(1));
    table.push(params, result(2));

    let nps: Vec<u64> = table.results(&params).iter().map(|r| r.nps).collect();
    assert_eq!(nps, vec![3, 1, 2]);
}

#[test]
fn test_keys_do_not_merge() {
    let mut table = ResultTable::new();
    table.push(BenchParams::new(1, 16, 14), result(1));
    table.push(BenchParams::new(1, 32, 14), result(2));

    assert_eq!(table.len(), 2);
    assert_eq!(table.count(&BenchParams::new(1, 16, 14)), 1);
    assert_eq!(table.count(&BenchParams::new(1, 32, 14)), 1);
    assert_eq!(table.count(&BenchParams::new(2, 16, 14)), 0);
}

#[test]
fn test_iteration_is_in_params_order() {
    let mut table = ResultTable::new();
    table.push(BenchParams::new(3, 16, 14), result(1));
    table.push(BenchParams::new(1, 16, 14), result(1));
    table.push(BenchParams::new(2, 16, 14), result(1));

    let threads: Vec<u32> = table.iter().map(|(p, _)| p.threads).collect();
    assert_eq!(threads, vec![1, 2, 3]);
}

#[test]
fn test_entries_carry_mean() {
    let params = BenchParams::new(1, 16, 14);
    let mut table = ResultTable::new();
    table.push(params, result(100));
    table.push(params, result(200));

    let entries = table.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].mean.unwrap().nps, 150.0);
    assert_eq!(table.max_runs(), 2);
}
