//! A small, illustrative standard component library.
//!
//! Not a manifest compiler's output: these four components exist to let the
//! rest of the workspace build and run end to end without generated code,
//! each a minimal example of one shape of `Component` (stateless passthrough,
//! stateful replay, counter, platform IO sink).

mod counter;
mod forward;
mod gpio;
mod ids;
mod io;
mod repeat;

pub use counter::Counter;
pub use forward::Forward;
pub use gpio::GpioWrite;
pub use io::{Io, SimulatedIo};
pub use repeat::Repeat;

use nanoflo_core::ComponentLibrary;

/// Register every factory-constructible component in this crate (everything
/// but [`GpioWrite`], which needs a pin and an `Io` handle at construction
/// time — see its doc comment).
pub fn register_all(library: &mut ComponentLibrary) {
    library.add(ids::FORWARD, || Box::new(Forward));
    library.add(ids::REPEAT, || Box::new(Repeat::default()));
    library.add(ids::COUNTER, || Box::new(Counter::default()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_all_populates_the_library() {
        let mut library = ComponentLibrary::new();
        register_all(&mut library);
        assert!(library.create(ids::FORWARD).is_some());
        assert!(library.create(ids::REPEAT).is_some());
        assert!(library.create(ids::COUNTER).is_some());
        assert!(library.create(ids::GPIO_WRITE).is_none());
    }
}
