//
// (C) Copyright IBM 2025
//
// This code is licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// copyright notice, and modified files need to carry a notice indicating
// that they have been altered from the originals.
use std::sync::Once;

static INIT: Once = Once::new();

/// Called once before running cutouts to initialize the logger. `RUST_LOG`
/// overrides `default_level`. If called more than once, the second and
/// subsequent calls are ignored.
pub fn initialize(default_level: &str) {
    INIT.call_once(|| {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .init();
    });
}
