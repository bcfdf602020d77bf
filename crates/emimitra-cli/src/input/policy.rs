use emimitra_core::LendingPolicy;

use super::file;

/// Load the lending policy from `path`, or the built-in defaults when no
/// file is given. `.json` files are read as JSON, anything else as YAML.
/// Keys missing from the file keep their default values.
pub fn load_policy(path: Option<&str>) -> Result<LendingPolicy, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(LendingPolicy::default());
    };

    let (canonical, contents) = file::read_text(path)?;
    let is_json = canonical
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let policy = if is_json {
        LendingPolicy::from_json(&contents)
            .map_err(|e| format!("Failed to load policy '{}': {}", canonical.display(), e))?
    } else {
        let policy: LendingPolicy = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse policy '{}': {}", canonical.display(), e))?;
        policy.validate()?;
        policy
    };

    tracing::info!(path = %canonical.display(), "lending policy loaded");
    Ok(policy)
}
