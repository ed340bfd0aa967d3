/// Per-source outcome of a scan cycle, tracked across its query URLs so
/// later URLs in the same source can be skipped once the source is known
/// broken or exhausted for this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceHealth {
    Ok,
    Broken,
    Exhausted,
}

/// Drives the stop/continue decision for one query URL's scan result,
/// given whether it was the first URL scanned for its source this cycle.
pub struct ScanOutcome {
    pub new_count: usize,
    pub total_count: usize,
}

pub fn evaluate(
    is_first_in_cycle: bool,
    outcome: &ScanOutcome,
    stop_after_no_result: bool,
    pagination_ended: bool,
) -> (SourceHealth, bool) {
    if is_first_in_cycle {
        if outcome.total_count == 0 {
            return (SourceHealth::Broken, true);
        }
        if outcome.new_count == 0 {
            return (SourceHealth::Exhausted, true);
        }
    } else if outcome.total_count > 0 && outcome.new_count == 0 {
        return (SourceHealth::Exhausted, true);
    }

    if stop_after_no_result {
        if pagination_ended {
            return (SourceHealth::Ok, true);
        }
        if outcome.total_count == 0 {
            return (SourceHealth::Ok, true);
        }
    }

    (SourceHealth::Ok, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(new: usize, total: usize) -> ScanOutcome {
        ScanOutcome {
            new_count: new,
            total_count: total,
        }
    }

    #[test]
    fn first_scan_with_zero_total_marks_broken_and_stops() {
        let (health, stop) = evaluate(true, &outcome(0, 0), false, false);
        assert_eq!(health, SourceHealth::Broken);
        assert!(stop);
    }

    #[test]
    fn first_scan_with_results_but_none_new_marks_exhausted() {
        let (health, stop) = evaluate(true, &outcome(0, 12), false, false);
        assert_eq!(health, SourceHealth::Exhausted);
        assert!(stop);
    }

    #[test]
    fn later_scan_with_no_new_results_marks_exhausted() {
        let (health, stop) = evaluate(false, &outcome(0, 8), false, false);
        assert_eq!(health, SourceHealth::Exhausted);
        assert!(stop);
    }

    #[test]
    fn later_scan_with_new_results_continues() {
        let (health, stop) = evaluate(false, &outcome(3, 8), false, false);
        assert_eq!(health, SourceHealth::Ok);
        assert!(!stop);
    }

    #[test]
    fn pagination_ended_stops_even_with_results() {
        let (health, stop) = evaluate(false, &outcome(5, 20), true, true);
        assert_eq!(health, SourceHealth::Ok);
        assert!(stop);
    }

    #[test]
    fn stop_after_no_result_with_zero_total_stops() {
        let (health, stop) = evaluate(false, &outcome(0, 0), true, false);
        assert_eq!(health, SourceHealth::Ok);
        assert!(stop);
    }
}
