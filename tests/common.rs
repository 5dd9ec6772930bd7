use gumdrop::Options;
use httpmock::MockServer;

use goose::config::GooseConfiguration;
use goose::goose::GooseUser;
use goose::metrics::{GooseCoordinatedOmissionMitigation, GooseMetrics};
use goose::GooseAttack;

/// Not all functions are used by all tests, so we enable allow(dead_code) to avoid
/// compiler warnings during testing.

/// The following options are configured by default, if not set to a custom value:
///  --host <mock-server>
///  --users 1
///  --hatch-rate 1
///  --run-time 1 (unless --iterations or --test-plan is set)
#[allow(dead_code)]
pub fn build_configuration(server: &MockServer, custom: Vec<&str>) -> GooseConfiguration {
    // Start with an empty configuration.
    let mut configuration: Vec<&str> = vec![];
    // Declare server_url here no matter what, so its lifetime is sufficient when needed.
    let server_url = server.base_url();

    // Merge in all custom options first.
    configuration.extend_from_slice(&custom);

    // Default to using mock server if not otherwise configured, "--host" "" leaves it unset.
    if !configuration.contains(&"--host") {
        configuration.extend_from_slice(&["--host", &server_url]);
    }

    // Default to testing with 1 user if not otherwise configured.
    if !configuration.contains(&"--users") && !configuration.contains(&"--test-plan") {
        configuration.extend_from_slice(&["--users", "1"]);
    }

    // Default to hatch 1 user per second if not otherwise configured.
    if !configuration.contains(&"--hatch-rate") && !configuration.contains(&"--test-plan") {
        configuration.extend_from_slice(&["--hatch-rate", "1"]);
    }

    // Default to running for 1 second if not otherwise limited.
    if !configuration.contains(&"--run-time")
        && !configuration.contains(&"--iterations")
        && !configuration.contains(&"--test-plan")
    {
        configuration.extend_from_slice(&["--run-time", "1"]);
    }

    // Parse these options to generate a GooseConfiguration.
    GooseConfiguration::parse_args_default(&configuration)
        .expect("failed to parse options and generate a configuration")
}

/// Build a standalone GooseUser pointed at the mock server, used to invoke
/// transaction functions directly.
#[allow(dead_code)]
pub fn build_user(server: &MockServer) -> GooseUser {
    let mut configuration = build_configuration(server, vec!["--quiet"]);
    // GooseAttack normally fills this in, a standalone user must have it set.
    configuration.co_mitigation = Some(GooseCoordinatedOmissionMitigation::Disabled);
    GooseUser::single(
        server
            .base_url()
            .parse()
            .expect("mock server url must parse"),
        &configuration,
    )
    .expect("failed to build a standalone user")
}

/// Run the actual load test, returning the GooseMetrics.
#[allow(dead_code)]
pub async fn run_load_test(goose_attack: GooseAttack) -> GooseMetrics {
    goose_attack
        .execute()
        .await
        .expect("load test failed to run")
}
