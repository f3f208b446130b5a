use regex::Regex;

/// Parse the bucket marker `answer(N)` out of a model response.
///
/// Only the first marker in the text is considered; a value outside 1..=3
/// counts as no answer rather than being clamped.
pub fn extract_bucket(text: &str) -> Option<u8> {
    let re = Regex::new(r"(?i)answer\((\d)\)").ok()?;
    let caps = re.captures(text)?;
    let bucket: u8 = caps[1].parse().ok()?;
    (1..=3).contains(&bucket).then_some(bucket)
}
