//! Event marker capability.

/// Marker trait for values that can be submitted to a machine.
///
/// An event is an immutable value created fresh by the caller for each
/// occurrence. It may carry data fields describing the occurrence (a
/// magnitude, a reading), or nothing at all. The machine never owns an
/// event: it is dropped once the reaction that consumed it returns.
///
/// Equality and ordering are not part of the contract.
///
/// # Example
///
/// ```rust
/// use flystate::Event;
///
/// struct TurnOn {
///     amps: f64,
/// }
///
/// impl Event for TurnOn {}
///
/// struct TurnOff;
///
/// impl Event for TurnOff {}
/// ```
pub trait Event {}
