/*! Integration tests for seria.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - format: Round trips, canonical output and parse failures of whole documents
 * - files: Reading and writing documents on disk
 * - node: The Node contract exercised on parsed documents
 * - transform: Pruning, must-exist lookups and ownership re-linking
 * - roster: Fleet editing on a world save
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("seria=info".parse().unwrap()))
        .with_test_writer()
        .try_init();
}

mod files;
mod format;
mod node;
mod roster;
mod transform;
