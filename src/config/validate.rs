//! Configuration validation.

use std::collections::HashSet;

use crate::cli::parse_distance_selection;
use crate::config::Config;
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_defaults(config)?;
    validate_species(config)?;
    validate_reference(config)?;
    Ok(())
}

/// Validate default settings.
fn validate_defaults(config: &Config) -> Result<()> {
    let defaults = &config.defaults;

    if defaults.min_visits == 0 {
        return Err(Error::ConfigValidation {
            message: "min_visits must be at least 1".to_string(),
        });
    }

    if let Some(spec) = &defaults.distances {
        parse_distance_selection(spec).map_err(|message| Error::InvalidDistanceSpec {
            value: spec.clone(),
            message,
        })?;
    }

    Ok(())
}

/// Validate the working species set.
fn validate_species(config: &Config) -> Result<()> {
    let working = &config.species.working;

    if working.is_empty() {
        return Err(Error::ConfigValidation {
            message: "species.working must not be empty".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for code in working {
        if !seen.insert(code) {
            return Err(Error::ConfigValidation {
                message: format!("species.working lists '{code}' more than once"),
            });
        }
    }

    Ok(())
}

/// Validate the reference species configuration against the working set.
fn validate_reference(config: &Config) -> Result<()> {
    let working: HashSet<&str> = config
        .species
        .working
        .iter()
        .map(String::as_str)
        .collect();

    for (focal, proxy) in &config.reference.proxies {
        if !working.contains(focal.as_str()) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "reference.proxies names focal species '{focal}' outside species.working"
                ),
            });
        }
        if focal == proxy {
            return Err(Error::ConfigValidation {
                message: format!("focal species '{focal}' cannot be its own proxy"),
            });
        }
    }

    if let Some(shared) = &config.reference.shared_curve {
        if shared.focal == shared.sibling {
            return Err(Error::ConfigValidation {
                message: format!(
                    "shared_curve focal '{}' cannot copy itself",
                    shared.focal
                ),
            });
        }
        for code in [&shared.focal, &shared.sibling] {
            if !working.contains(code.as_str()) {
                return Err(Error::ConfigValidation {
                    message: format!(
                        "shared_curve names species '{code}' outside species.working"
                    ),
                });
            }
        }
        if config.reference.proxies.contains_key(&shared.focal) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "species '{}' cannot both copy a sibling and have its own proxy",
                    shared.focal
                ),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SharedCurveConfig;

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_min_visits() {
        let mut config = Config::default();
        config.defaults.min_visits = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_bad_distance_spec() {
        let mut config = Config::default();
        config.defaults.distances = Some("10-2000".to_string());
        let result = validate_config(&config);
        assert!(matches!(result, Err(Error::InvalidDistanceSpec { .. })));
    }

    #[test]
    fn test_validate_empty_species() {
        let mut config = Config::default();
        config.species.working.clear();
        config.reference.proxies.clear();
        config.reference.shared_curve = None;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_duplicate_species() {
        let mut config = Config::default();
        config.species.working.push("OVEN".to_string());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_focal_outside_working_set() {
        let mut config = Config::default();
        config
            .reference
            .proxies
            .insert("CONW".to_string(), "MOWA".to_string());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_shared_curve_self_copy() {
        let mut config = Config::default();
        config.reference.shared_curve = Some(SharedCurveConfig {
            focal: "PHVI".to_string(),
            sibling: "PHVI".to_string(),
        });
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_shared_focal_with_own_proxy() {
        let mut config = Config::default();
        config
            .reference
            .proxies
            .insert("PHVI".to_string(), "REVI".to_string());
        assert!(validate_config(&config).is_err());
    }
}
