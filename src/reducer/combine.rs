use std::collections::HashMap;
use std::sync::Arc;

use super::Reducer;

/// Map-shaped aggregate state: named slices, each behind an `Arc` so an
/// unchanged slice keeps its identity across transitions.
pub type SliceMap<V> = HashMap<String, Arc<V>>;

/// Reducer for a single named slice of a [`SliceMap`].
///
/// The slice is `None` when the aggregate state does not carry the key
/// yet; the reducer must produce an initial slice in that case.
/// Returning the `Arc` it was handed marks the slice unchanged.
pub type SliceReducer<V, A> = Box<dyn Fn(Option<Arc<V>>, &A) -> Arc<V> + Send + Sync>;

/// Build one reducer from a mapping of named slice reducers.
///
/// Every dispatch runs each slice reducer against its own slice; no
/// reducer can see a sibling's slice. When no slice changed (every
/// reducer returned the `Arc` it received) the incoming map is handed
/// back untouched, so consumers can detect no-op transitions cheaply.
/// When any slice changed, the result holds exactly the mapping's keys;
/// keys the mapping does not know are not carried over.
pub fn combine_reducers<V, A>(
    reducers: HashMap<String, SliceReducer<V, A>>,
) -> Reducer<SliceMap<V>, A>
where
    V: 'static,
    A: 'static,
{
    Box::new(move |state: SliceMap<V>, action: &A| {
        let mut next = SliceMap::with_capacity(reducers.len());
        let mut changed = false;

        for (key, reducer) in &reducers {
            let previous = state.get(key).cloned();
            let next_slice = reducer(previous.clone(), action);
            changed = changed
                || previous
                    .as_ref()
                    .map_or(true, |slice| !Arc::ptr_eq(slice, &next_slice));
            next.insert(key.clone(), next_slice);
        }

        if changed {
            next
        } else {
            state
        }
    })
}
