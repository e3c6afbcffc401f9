use crate::store::Dispatch;

/// Turn an action creator into a function that dispatches what it makes.
///
/// The returned closure feeds the created action straight into the given
/// dispatch handle and returns the handle's result. Obtain the handle
/// from [`Store::dispatcher`](crate::store::Store::dispatcher) so the
/// binding follows any middleware installed on the store.
pub fn bind_action_creator<P, A, C>(action_creator: C, dispatch: Dispatch<A>) -> impl Fn(P) -> A
where
    C: Fn(P) -> A,
{
    move |payload| dispatch(action_creator(payload))
}
