//! Test knobs, read from the environment.

/// Returns the number of iterations of multi-threaded tests.
///
/// Read from `TIMM_MULTI_NUMBER_ITERATIONS`, defaults to 10.
pub fn number_iterations() -> usize { read_number_from_environment("TIMM_MULTI_NUMBER_ITERATIONS", 10) }

/// Returns the number of threads of multi-threaded tests.
///
/// Read from `TIMM_MULTI_NUMBER_THREADS`, defaults to the number of CPUs, with a minimum of 2.
pub fn number_threads() -> usize { read_number_from_environment("TIMM_MULTI_NUMBER_THREADS", num_cpus::get().max(2)) }

/// Reads the number from the environment variable `name`, or returns `default` if absent or invalid.
pub fn read_number_from_environment(name: &str, default: usize) -> usize {
    if let Ok(value) = std::env::var(name) {
        if let Ok(result) = value.parse() {
            println!("read_number_from_environment - {}: {}", name, result);
            return result;
        }
    }

    println!("read_number_from_environment - {}: {} (default)", name, default);
    default
}

// mod tests
