pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse comma-separated seeds. Negative values fold to their magnitude.
pub fn parse_seeds(tokens: &[String]) -> anyhow::Result<Vec<u64>> {
    tokens
        .iter()
        .map(|token| {
            token
                .parse::<i64>()
                .map(i64::unsigned_abs)
                .or_else(|_| token.parse::<u64>())
                .map_err(|_| anyhow::anyhow!("invalid seed '{token}'"))
        })
        .collect()
}
