/// Candidate delimiters, tried in order. Comma wins ties because it comes
/// first and later candidates must strictly beat the running best.
pub const CANDIDATE_DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// Pick the delimiter that splits the first 3 non-empty lines into the
/// highest mean column count. Never fails; empty or single-column input
/// falls back to a comma.
pub fn detect_delimiter(sample: &str) -> char {
    let lines: Vec<&str> = sample
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(3)
        .collect();
    if lines.is_empty() {
        return ',';
    }

    let mut best = ',';
    let mut best_mean = 0.0_f64;
    for candidate in CANDIDATE_DELIMITERS {
        let total: usize = lines.iter().map(|line| line.split(candidate).count()).sum();
        let mean = total as f64 / lines.len() as f64;
        if mean > best_mean {
            best_mean = mean;
            best = candidate;
        }
    }
    best
}
