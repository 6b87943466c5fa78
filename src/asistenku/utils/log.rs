// src/asistenku/utils/log.rs
//
// Tagged debug printing. Inside a canister this goes to the replica debug log,
// natively it goes to stderr so tests and tools still see it.

pub fn print<S: AsRef<str>>(message: S) {
    #[cfg(target_arch = "wasm32")]
    ic_cdk::api::print(message.as_ref());
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("{}", message.as_ref());
}

macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::utils::log::print(format!("INFO: {}", format_args!($($arg)*)))
    };
}

macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::utils::log::print(format!("WARN: {}", format_args!($($arg)*)))
    };
}

macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::utils::log::print(format!("ERROR: {}", format_args!($($arg)*)))
    };
}
