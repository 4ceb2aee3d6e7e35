pub fn default_retries() -> u32 {
    2
}

pub fn default_timeout_seconds() -> u64 {
    30
}

pub fn default_host() -> String {
    "https://github.com".to_string()
}

pub fn default_branch() -> String {
    "main".to_string()
}

pub fn default_locations() -> Vec<String> {
    ["lib/plugin.js", "plugin.js", "index.js"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub fn default_max_chars() -> usize {
    100_000
}
