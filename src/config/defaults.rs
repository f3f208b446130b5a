pub fn default_max_retries() -> u32 {
    5
}

pub fn default_base_delay_secs() -> f64 {
    5.0
}

pub fn default_cooldown_secs() -> u64 {
    5
}

pub fn default_max_tokens() -> u32 {
    4096
}

pub fn default_timeout_secs() -> u64 {
    600
}
