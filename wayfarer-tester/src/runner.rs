use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use wayfarer_game::{Content, Cycle};

use crate::scenarios::{RunContext, Scenario};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub cycle: Cycle,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    /// XxHash64 fingerprint of the first iteration, for comparing builds.
    pub fingerprint: Option<u64>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
}

pub struct LogicTester<'c> {
    content: &'c Content,
    steps: usize,
    verbose: bool,
}

impl<'c> LogicTester<'c> {
    pub const fn new(content: &'c Content, steps: usize, verbose: bool) -> Self {
        Self {
            content,
            steps,
            verbose,
        }
    }

    pub fn run_scenario(
        &self,
        scenario: &Scenario,
        cycles: &[Cycle],
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::new();
        for &cycle in cycles {
            for &seed in seeds {
                if self.verbose {
                    println!(
                        "🧪 Testing scenario: {} (cycle: {} seed: {})",
                        scenario.key.bright_white(),
                        cycle,
                        seed
                    );
                }
                results.push(self.run_single(scenario, cycle, seed, iterations));
            }
        }
        results
    }

    /// Run `iterations` seeds starting at `seed`. Each iteration runs twice and
    /// the two fingerprints must agree.
    fn run_single(
        &self,
        scenario: &Scenario,
        cycle: Cycle,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut durations = Vec::new();
        let mut fingerprint = None;

        for i in 0..iterations {
            let ctx = RunContext {
                content: self.content,
                cycle,
                seed: seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX)),
                steps: self.steps,
            };
            let start_time = Instant::now();
            let outcome = scenario.run(&ctx).and_then(|first| {
                let second = scenario.run(&ctx)?;
                anyhow::ensure!(
                    first == second,
                    "non-deterministic run: fingerprint {:016x} then {:016x}",
                    first.fingerprint,
                    second.fingerprint
                );
                Ok(first)
            });

            match outcome {
                Ok(run) => {
                    successes += 1;
                    let duration = start_time.elapsed();
                    durations.push(duration);
                    fingerprint.get_or_insert(run.fingerprint);
                    if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{} passed ({duration:?}) actions:{} fingerprint:{:016x}",
                            i + 1,
                            iterations,
                            run.actions,
                            run.fingerprint
                        );
                    }
                }
                Err(err) => {
                    let message = format!("Iteration {} (seed {}): {err:#}", i + 1, ctx.seed);
                    if self.verbose {
                        println!(
                            "  ❌ Iteration {}/{} failed: {}",
                            i + 1,
                            iterations,
                            message.clone().red()
                        );
                    }
                    log::warn!("{message}");
                    failures.push(message);
                }
            }
        }

        let average_duration = if durations.is_empty() {
            Duration::ZERO
        } else {
            durations.iter().sum::<Duration>() / u32::try_from(durations.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.key.to_string(),
            cycle,
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            fingerprint,
            average_duration,
        }
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_micros().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = u128::deserialize(deserializer)?;
        Ok(Duration::from_micros(u64::try_from(micros).unwrap_or(0)))
    }
}
