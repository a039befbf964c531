/// Implemented by resources that fill in unset fields before they are admitted.
///
/// Mirrors the `apis.Defaultable` interface of knative.dev/pkg. Defaulting must be
/// idempotent: calling [`Defaultable::set_defaults`] twice yields the same object.
pub trait Defaultable {
    fn set_defaults(&mut self);
}
