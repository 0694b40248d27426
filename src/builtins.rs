//! Symbols required by rustc/LLVM, and the panic handler

#[cfg(debug_assertions)]
use super::{board, startup};

#[cfg(debug_assertions)]
use core::panic::PanicInfo;

/// Required by the compiler.
#[no_mangle]
pub extern "C" fn __aeabi_unwind_cpp_pr0() -> () {}

/// Required by the compiler.
#[no_mangle]
pub extern "C" fn __aeabi_unwind_cpp_pr1() -> () {}

/// Required by modules that haven't been build with panic = "abort"
#[allow(non_snake_case)]
#[no_mangle]
pub extern "C" fn _Unwind_Resume() -> () {}

/// Debug builds only; release builds link `panic-never` so that any
/// reachable panic is a link error instead.
#[cfg(debug_assertions)]
#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    startup::report_fault(|port| {
        if let Some(location) = info.location() {
            let _ = writeln!(port, "panic at {}:{}", location.file(), location.line());
        } else {
            let _ = writeln!(port, "panic");
        }
    });
    board::safe();
}
