//! Solver engine delegation
//!
//! Each backend translates a validated [`Modeler`] into the native model of
//! one engine, runs the engine and maps its status and values back into a
//! [`Solution`]. Backends are compiled in through cargo features.

use anyhow::{Context, Result, anyhow};
use std::env;
use std::fmt;
use std::str::FromStr;

use super::{Modeler, Solution};

#[cfg(feature = "coin_cbc")]
pub mod coin_cbc;
#[cfg(feature = "gurobi")]
pub mod gurobi;
pub mod output_suppression;

/// Environment variable selecting the backend when none is configured
pub const SOLVER_ENV_VAR: &str = "MODELER_SOLVER";

/// Available solver backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverBackend {
    #[cfg(feature = "gurobi")]
    /// Gurobi commercial solver
    Gurobi,
    #[cfg(feature = "coin_cbc")]
    /// Coin CBC open-source solver
    CoinCbc,
}

impl SolverBackend {
    /// Parse a backend name, failing when the backend is not compiled in
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "gurobi" => {
                #[cfg(feature = "gurobi")]
                return Ok(SolverBackend::Gurobi);
                #[cfg(not(feature = "gurobi"))]
                return Err(anyhow!(
                    "Gurobi solver requested but the gurobi feature is not enabled"
                ));
            }
            "coin_cbc" | "coin-cbc" | "cbc" => {
                #[cfg(feature = "coin_cbc")]
                return Ok(SolverBackend::CoinCbc);
                #[cfg(not(feature = "coin_cbc"))]
                return Err(anyhow!(
                    "Coin CBC solver requested but the coin_cbc feature is not enabled"
                ));
            }
            _ => Err(anyhow!(
                "Invalid solver '{}'. Valid options: gurobi, coin_cbc",
                name
            )),
        }
    }

    /// Get the solver backend from the environment or use fallback logic
    pub fn from_env_or_default() -> Result<Self> {
        if let Ok(solver_name) = env::var(SOLVER_ENV_VAR) {
            return Self::from_name(&solver_name)
                .map_err(|e| anyhow!("{} (from {})", e, SOLVER_ENV_VAR));
        }
        Self::default_backend()
    }

    /// Prefer gurobi if available, then coin_cbc
    pub fn default_backend() -> Result<Self> {
        #[cfg(feature = "gurobi")]
        return Ok(SolverBackend::Gurobi);

        #[allow(unreachable_code)]
        #[cfg(feature = "coin_cbc")]
        return Ok(SolverBackend::CoinCbc);

        #[cfg(not(any(feature = "gurobi", feature = "coin_cbc")))]
        Err(anyhow!(
            "No solver backend available. Please enable a solver feature (e.g., 'gurobi' or 'coin_cbc')"
        ))
    }

    pub(crate) fn solve<Brand>(
        self,
        modeler: &Modeler<Brand>,
        params: &SolverParams,
    ) -> Result<Solution<Brand>> {
        match self {
            #[cfg(feature = "gurobi")]
            SolverBackend::Gurobi => gurobi::solve_gurobi(modeler, params),

            #[cfg(feature = "coin_cbc")]
            SolverBackend::CoinCbc => coin_cbc::solve_coin_cbc(modeler, params),
        }
    }
}

impl FromStr for SolverBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            #[cfg(feature = "gurobi")]
            SolverBackend::Gurobi => write!(f, "gurobi"),
            #[cfg(feature = "coin_cbc")]
            SolverBackend::CoinCbc => write!(f, "coin_cbc"),
        }
    }
}

/// Parameters forwarded to the solver engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverParams {
    /// Backend to use; `None` defers to `MODELER_SOLVER` and the compiled-in default
    pub backend: Option<SolverBackend>,
    /// Time limit in seconds
    pub time_limit: Option<f64>,
    /// Relative MIP gap at which the search stops
    pub mip_gap: Option<f64>,
    /// Number of engine threads
    pub threads: Option<u32>,
    /// Let the engine print its log
    pub verbose: bool,
}

impl SolverParams {
    pub fn with_backend(mut self, backend: SolverBackend) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn with_mip_gap(mut self, gap: f64) -> Self {
        self.mip_gap = Some(gap);
        self
    }

    pub fn with_threads(mut self, threads: u32) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Thread count in the signed width engine APIs take
    pub(crate) fn engine_threads(&self) -> Result<Option<i32>> {
        self.threads
            .map(|threads| {
                i32::try_from(threads).with_context(|| format!("thread count {} is out of range", threads))
            })
            .transpose()
    }
}
