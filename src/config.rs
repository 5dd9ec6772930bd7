//! Environment defaults for the load test.
//!
//! Values read here are handed to Goose with
//! [`set_default`](goose::config::GooseDefaultType::set_default), so any
//! option passed on the command line still takes precedence.
//!
//!  - `TARGET_HOST`: base URL of the API, defaults to `http://localhost:8080`.
//!  - `TASKAPI_TEST_PLAN`: a Goose test plan, or `ramp` for [`RAMP_TEST_PLAN`].
//!  - `TASKAPI_SCENARIOS`: comma separated scenario machine names to run.
//!  - `TASKAPI_THRESHOLDS`: `default`, or `{p95_ms},{max_failure_percent}`.
//!    Checked once the load test finishes, see [`Thresholds`].

use goose::config::{GooseDefault, GooseDefaultType};
use goose::{GooseAttack, GooseError};
use regex::Regex;
use std::env;
use url::Url;

use crate::thresholds::Thresholds;

/// Environment variable holding the base URL of the API under test.
pub const TARGET_HOST_VAR: &str = "TARGET_HOST";
/// Environment variable holding a default test plan.
pub const TEST_PLAN_VAR: &str = "TASKAPI_TEST_PLAN";
/// Environment variable limiting the scenarios that run.
pub const SCENARIOS_VAR: &str = "TASKAPI_SCENARIOS";
/// Environment variable enabling pass/fail thresholds.
pub const THRESHOLDS_VAR: &str = "TASKAPI_THRESHOLDS";

/// Host targeted when `TARGET_HOST` isn't set.
pub const DEFAULT_HOST: &str = "http://localhost:8080";

/// Ramp to 10 users over 2 minutes, hold 5 minutes, ramp to 20 over 2 minutes,
/// hold 5 minutes, then ramp down to 0 over 2 minutes.
pub const RAMP_TEST_PLAN: &str = "10,2m;10,5m;20,2m;20,5m;0,2m";

// A single "{users},{timespan}" step, using the timespan syntax Goose accepts.
const TEST_PLAN_STEP: &str = r"^\s*(\d+)\s*,\s*(\d+|((\d+?)h)?((\d+?)m)?((\d+?)s)?)\s*$";

/// Defaults applied to the [`GooseAttack`] before it is executed.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadTestDefaults {
    pub host: String,
    pub test_plan: Option<String>,
    pub scenarios: Option<String>,
    /// Not a Goose option, evaluated against the metrics after the run.
    pub thresholds: Option<Thresholds>,
}

impl Default for LoadTestDefaults {
    fn default() -> Self {
        LoadTestDefaults {
            host: DEFAULT_HOST.to_string(),
            test_plan: None,
            scenarios: None,
            thresholds: None,
        }
    }
}

impl LoadTestDefaults {
    /// Reads the defaults from the process environment.
    pub fn from_env() -> Result<Self, GooseError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the defaults through `lookup`, which maps a variable name to its
    /// value. Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GooseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let host = match read(TARGET_HOST_VAR) {
            Some(host) => validate_host(host)?,
            None => DEFAULT_HOST.to_string(),
        };
        let test_plan = read(TEST_PLAN_VAR).map(validate_test_plan).transpose()?;
        let scenarios = read(SCENARIOS_VAR).map(validate_scenarios).transpose()?;
        let thresholds = read(THRESHOLDS_VAR)
            .map(|value| value.parse::<Thresholds>())
            .transpose()?;

        Ok(LoadTestDefaults {
            host,
            test_plan,
            scenarios,
            thresholds,
        })
    }

    /// Sets these values as defaults on `goose_attack`.
    pub fn apply(&self, goose_attack: GooseAttack) -> Result<GooseAttack, GooseError> {
        let mut goose_attack = *goose_attack.set_default(GooseDefault::Host, self.host.as_str())?;
        if let Some(test_plan) = &self.test_plan {
            goose_attack =
                *goose_attack.set_default(GooseDefault::TestPlan, test_plan.as_str())?;
        }
        if let Some(scenarios) = &self.scenarios {
            goose_attack =
                *goose_attack.set_default(GooseDefault::Scenarios, scenarios.as_str())?;
        }

        Ok(goose_attack)
    }
}

fn invalid(option: &str, value: &str, detail: &str) -> GooseError {
    GooseError::InvalidOption {
        option: option.to_string(),
        value: value.to_string(),
        detail: detail.to_string(),
    }
}

/// The host must be an absolute http or https URL.
fn validate_host(host: String) -> Result<String, GooseError> {
    let url = Url::parse(&host).map_err(|e| {
        invalid(
            TARGET_HOST_VAR,
            &host,
            &format!("failed to parse host: {}", e),
        )
    })?;
    if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
        return Err(invalid(
            TARGET_HOST_VAR,
            &host,
            "host must be an http:// or https:// URL.",
        ));
    }

    Ok(host)
}

/// Expands `ramp` and checks every step of any other plan, as Goose panics on
/// an invalid default.
fn validate_test_plan(test_plan: String) -> Result<String, GooseError> {
    if test_plan.eq_ignore_ascii_case("ramp") {
        return Ok(RAMP_TEST_PLAN.to_string());
    }

    let step = Regex::new(TEST_PLAN_STEP)
        .map_err(|e| invalid(TEST_PLAN_VAR, TEST_PLAN_STEP, &e.to_string()))?;
    if let Some(bad_step) = test_plan.split(';').find(|line| !step.is_match(line)) {
        return Err(invalid(
            TEST_PLAN_VAR,
            bad_step,
            "expected \"{users},{timespan};{users},{timespan}\", ie \"10,2m;10,5m;0,30s\".",
        ));
    }

    Ok(test_plan)
}

/// Scenario machine names are alphanumeric only.
fn validate_scenarios(scenarios: String) -> Result<String, GooseError> {
    if let Some(bad_name) = scenarios
        .split(',')
        .map(str::trim)
        .find(|name| name.is_empty() || !name.chars().all(char::is_alphanumeric))
    {
        return Err(invalid(
            SCENARIOS_VAR,
            bad_name,
            "scenario names must be alphanumeric, view valid names with --scenarios-list.",
        ));
    }

    Ok(scenarios)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn defaults(vars: &[(&str, &str)]) -> Result<LoadTestDefaults, GooseError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LoadTestDefaults::from_lookup(|key| vars.get(key).cloned())
    }

    fn assert_invalid(result: Result<LoadTestDefaults, GooseError>, expected_option: &str) {
        match result {
            Err(GooseError::InvalidOption { option, .. }) => assert_eq!(option, expected_option),
            other => panic!("expected InvalidOption for {}, got {:?}", expected_option, other),
        }
    }

    #[test]
    fn empty_environment() {
        assert_eq!(defaults(&[]).unwrap(), LoadTestDefaults::default());
        // Blank values are ignored.
        assert_eq!(
            defaults(&[(TARGET_HOST_VAR, "  "), (TEST_PLAN_VAR, "")]).unwrap(),
            LoadTestDefaults::default()
        );
    }

    #[test]
    fn target_host() {
        let loaded = defaults(&[(TARGET_HOST_VAR, "https://tasks.example.com/")]).unwrap();
        assert_eq!(loaded.host, "https://tasks.example.com/");

        assert_invalid(defaults(&[(TARGET_HOST_VAR, "not a url")]), TARGET_HOST_VAR);
        assert_invalid(
            defaults(&[(TARGET_HOST_VAR, "localhost:8080")]),
            TARGET_HOST_VAR,
        );
        assert_invalid(
            defaults(&[(TARGET_HOST_VAR, "ftp://tasks.example.com")]),
            TARGET_HOST_VAR,
        );
    }

    #[test]
    fn test_plan() {
        let loaded = defaults(&[(TEST_PLAN_VAR, "RAMP")]).unwrap();
        assert_eq!(loaded.test_plan.as_deref(), Some(RAMP_TEST_PLAN));

        let loaded = defaults(&[(TEST_PLAN_VAR, "5,30s; 5,1h30m;0,0")]).unwrap();
        assert_eq!(loaded.test_plan.as_deref(), Some("5,30s; 5,1h30m;0,0"));

        assert_invalid(defaults(&[(TEST_PLAN_VAR, "ten,2m")]), TEST_PLAN_VAR);
        assert_invalid(defaults(&[(TEST_PLAN_VAR, "10,2m;;0,1m")]), TEST_PLAN_VAR);
    }

    #[test]
    fn ramp_is_a_valid_plan() {
        assert!(validate_test_plan(RAMP_TEST_PLAN.to_string()).is_ok());
    }

    #[test]
    fn scenarios() {
        let loaded = defaults(&[(SCENARIOS_VAR, "dashboarduser, taskmanagementuser")]).unwrap();
        assert_eq!(
            loaded.scenarios.as_deref(),
            Some("dashboarduser, taskmanagementuser")
        );

        assert_invalid(defaults(&[(SCENARIOS_VAR, "Dashboard User")]), SCENARIOS_VAR);
        assert_invalid(defaults(&[(SCENARIOS_VAR, "a,,b")]), SCENARIOS_VAR);
    }

    #[test]
    fn thresholds() {
        let loaded = defaults(&[(THRESHOLDS_VAR, "default")]).unwrap();
        assert_eq!(loaded.thresholds, Some(Thresholds::default()));

        let loaded = defaults(&[(THRESHOLDS_VAR, "1000,1")]).unwrap();
        assert_eq!(
            loaded.thresholds,
            Some(Thresholds {
                p95_ms: 1000,
                max_failure_percent: 1.0
            })
        );

        assert_invalid(defaults(&[(THRESHOLDS_VAR, "on")]), THRESHOLDS_VAR);
    }
}
