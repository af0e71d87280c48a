use nanoflo_core::ComponentId;

/// Ids for this crate's components. Arbitrary past the reserved low range a
/// code-generated component table would occupy; picked to not collide with
/// whatever a generated table assigns starting from 0.
pub const FORWARD: ComponentId = ComponentId(100);
pub const REPEAT: ComponentId = ComponentId(101);
pub const COUNTER: ComponentId = ComponentId(102);
pub const GPIO_WRITE: ComponentId = ComponentId(103);
