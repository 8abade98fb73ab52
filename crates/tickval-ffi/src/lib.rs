//! C-linkage entry points for hosts that load the validator as a
//! dynamic library (trading terminals, scripting runtimes).
//!
//! Every export is stateless, allocation-free and safe to call from any
//! thread. No export panics on any input.

use libc::{c_int, size_t};

use tickval_core::{validate, Tick};

/// ABI revision of this library's export table.
pub const ABI_VERSION: u32 = 1;

/// Validate a tick. Returns `true` when `bid > 0`, `ask > bid` and
/// `spread > 0`. `time` is ignored.
#[no_mangle]
pub extern "C" fn validate_tick(bid: f64, ask: f64, time: f64, spread: c_int) -> bool {
    tickval_core::validate_tick(bid, ask, time, spread)
}

/// Validate a tick and return the verdict code (0 = valid).
#[no_mangle]
pub extern "C" fn validate_tick_reason(bid: f64, ask: f64, time: f64, spread: c_int) -> u8 {
    validate(bid, ask, time, spread).code()
}

/// Validate `len` ticks.
///
/// When `codes` is non-null one verdict code is written per tick.
/// Returns the number of valid ticks; a null `ticks` returns 0.
///
/// # Safety
///
/// `ticks` must point to `len` initialized `Tick` records and `codes`,
/// when non-null, to `len` writable bytes. The two regions must not
/// overlap.
#[no_mangle]
pub unsafe extern "C" fn validate_ticks(ticks: *const Tick, len: size_t, codes: *mut u8) -> size_t {
    if ticks.is_null() || len == 0 {
        return 0;
    }

    let ticks = core::slice::from_raw_parts(ticks, len);
    let mut valid = 0;

    if codes.is_null() {
        for tick in ticks {
            valid += tick.is_valid() as size_t;
        }
        return valid;
    }

    let codes = core::slice::from_raw_parts_mut(codes, len);
    for (tick, code) in ticks.iter().zip(codes.iter_mut()) {
        let verdict = tick.verdict();
        *code = verdict.code();
        valid += verdict.is_valid() as size_t;
    }

    valid
}

/// ABI revision, for hosts that probe the library before binding.
#[no_mangle]
pub extern "C" fn tick_validator_abi_version() -> u32 {
    ABI_VERSION
}

/// Library lifecycle hook. Nothing to set up or tear down.
#[cfg(windows)]
#[no_mangle]
#[allow(non_snake_case)]
pub extern "system" fn DllMain(
    _module: *mut core::ffi::c_void,
    _reason: u32,
    _reserved: *mut core::ffi::c_void,
) -> i32 {
    1
}
