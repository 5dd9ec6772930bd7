//! Load test the task management API.
//!
//! To run, point `TARGET_HOST` (or `--host`) at the API and pass any other
//! Goose options, starting with:
//!      cargo run --release -- --users 10 --hatch-rate 2 --run-time 5m
//!
//! With `TASKAPI_THRESHOLDS=default` the process exits with status 1 when the
//! finished load test breached a threshold.
//!
//! ## License
//!
//! Copyright 2026 The taskapi-loadtest Authors
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! you may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//! http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

use goose::prelude::*;
use log::{error, info};

use taskapi_loadtest::config::LoadTestDefaults;

#[tokio::main]
async fn main() -> Result<(), GooseError> {
    // Read the environment first, so a bad value fails before any user starts.
    let defaults = LoadTestDefaults::from_env()?;

    let goose_attack = taskapi_loadtest::register_scenarios(GooseAttack::initialize()?)?;
    let goose_metrics = defaults.apply(goose_attack)?.execute().await?;

    if let Some(thresholds) = &defaults.thresholds {
        let breaches = thresholds.check(&goose_metrics);
        if !breaches.is_empty() {
            for breach in &breaches {
                error!("threshold breached: {}", breach);
            }
            std::process::exit(1);
        }
        info!("all thresholds passed");
    }

    Ok(())
}
