use std::path::Path;

use crate::runner::BenchmarkResult;

/// A complete baseline containing results from all scenes.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Baseline {
    pub timestamp: String,
    pub results: Vec<BenchmarkResult>,
}

/// Load a baseline from a JSON file. Returns None if the file is missing or
/// not a baseline.
pub fn load_baseline(path: &Path) -> Option<Baseline> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(baseline) => Some(baseline),
        Err(e) => {
            log::warn!("Ignoring malformed baseline {}: {e}", path.display());
            None
        }
    }
}

pub fn save_baseline(path: &Path, baseline: &Baseline) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(baseline).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

/// (scene name, percent change of mean frame time) for every scene slower
/// than its baseline by more than `threshold_pct`.
pub fn compare(
    current: &[BenchmarkResult],
    baseline: &Baseline,
    threshold_pct: f64,
) -> Vec<(String, f64)> {
    let mut regressions = Vec::new();

    for result in current {
        let Some(base) = baseline
            .results
            .iter()
            .find(|b| b.scene_name == result.scene_name)
        else {
            continue;
        };
        if base.timings.mean_ms <= 0.0 {
            continue;
        }
        let pct_change =
            (result.timings.mean_ms - base.timings.mean_ms) / base.timings.mean_ms * 100.0;
        if pct_change > threshold_pct {
            regressions.push((result.scene_name.clone(), pct_change));
        }
    }

    regressions
}

/// Format results as a markdown summary table.
pub fn format_markdown(results: &[BenchmarkResult]) -> String {
    let mut out = String::new();
    out.push_str("| Scene | Frames | Peak chunks | Generated | Meshed | Uploads | Draws/frame | Mean (ms) | Median (ms) | P95 (ms) | P99 (ms) | Min (ms) | Max (ms) |\n");
    out.push_str("|-------|--------|-------------|-----------|--------|---------|-------------|-----------|-------------|----------|----------|----------|----------|\n");

    for r in results {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {:.1} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} |\n",
            r.scene_name,
            r.frame_count,
            r.peak_loaded,
            r.chunks_generated,
            r.chunks_meshed,
            r.uploads,
            r.mean_draws,
            r.timings.mean_ms,
            r.timings.median_ms,
            r.timings.p95_ms,
            r.timings.p99_ms,
            r.timings.min_ms,
            r.timings.max_ms,
        ));
    }

    out
}

pub fn format_comparison(regressions: &[(String, f64)], threshold_pct: f64) -> String {
    if regressions.is_empty() {
        return format!(
            "All scenes within {:.0}% threshold. No regressions detected.\n",
            threshold_pct
        );
    }

    let mut out = format!("REGRESSIONS DETECTED (>{:.0}% threshold):\n", threshold_pct);
    for (scene, pct) in regressions {
        out.push_str(&format!("  - {}: +{:.1}%\n", scene, pct));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::compute_timings;

    fn result(name: &str, mean: f64) -> BenchmarkResult {
        BenchmarkResult {
            scene_name: name.to_string(),
            frame_count: 1,
            peak_loaded: 27,
            chunks_generated: 27,
            chunks_meshed: 27,
            uploads: 9,
            mean_draws: 9.0,
            timings: compute_timings(&[mean]),
        }
    }

    #[test]
    fn test_compare_flags_only_slow_scenes() {
        let baseline = Baseline {
            timestamp: "t".to_string(),
            results: vec![result("a", 10.0), result("b", 10.0)],
        };
        let current = vec![result("a", 10.5), result("b", 13.0), result("new", 99.0)];
        let regressions = compare(&current, &baseline, 10.0);
        assert_eq!(regressions.len(), 1);
        assert_eq!(regressions[0].0, "b");
        assert!((regressions[0].1 - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_markdown_has_row_per_scene() {
        let md = format_markdown(&[result("a", 1.0), result("b", 2.0)]);
        assert_eq!(md.lines().count(), 4);
        assert!(md.contains("| b | 1 | 27 |"));
    }

    #[test]
    fn test_baseline_round_trips_through_json() {
        let path = std::env::temp_dir().join(format!("cubist-baseline-{}.json", std::process::id()));
        let baseline = Baseline {
            timestamp: "t".to_string(),
            results: vec![result("a", 1.5)],
        };
        save_baseline(&path, &baseline).expect("write baseline");
        let loaded = load_baseline(&path).expect("read baseline");
        assert_eq!(loaded.results, baseline.results);
        std::fs::remove_file(&path).ok();
        assert!(load_baseline(&path).is_none());
    }

    #[test]
    fn test_comparison_text() {
        assert!(format_comparison(&[], 10.0).contains("No regressions"));
        let text = format_comparison(&[("b".to_string(), 30.0)], 10.0);
        assert!(text.contains("b: +30.0%"));
    }
}
