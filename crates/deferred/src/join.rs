use futures::FutureExt;

use crate::Deferred;

/// Combines all values into one. Ready values are kept as they are and only the pending ones
/// are awaited together, so the result is ready if every input was. Input order is preserved.
pub fn join_all<T>(values: impl IntoIterator<Item = Deferred<T>>) -> Deferred<Vec<T>>
where
    T: Send + 'static,
{
    let mut slots = Vec::new();
    let mut pending = Vec::new();

    for (index, value) in values.into_iter().enumerate() {
        match value {
            Deferred::Ready(value) => slots.push(Some(value)),
            Deferred::Pending(future) => {
                slots.push(None);
                pending.push(future.map(move |value| (index, value)));
            }
        }
    }

    if pending.is_empty() {
        return Deferred::Ready(slots.into_iter().flatten().collect());
    }

    Deferred::pending(async move {
        for (index, value) in futures::future::join_all(pending).await {
            slots[index] = Some(value);
        }
        slots.into_iter().flatten().collect()
    })
}

/// Fallible counterpart of [`join_all`]. The first error, ready or pending, wins and the
/// remaining pending values are dropped.
pub fn try_join_all<T, E>(values: impl IntoIterator<Item = Deferred<Result<T, E>>>) -> Deferred<Result<Vec<T>, E>>
where
    T: Send + 'static,
    E: Send + 'static,
{
    let mut slots = Vec::new();
    let mut pending = Vec::new();

    for (index, value) in values.into_iter().enumerate() {
        match value {
            Deferred::Ready(Ok(value)) => slots.push(Some(value)),
            Deferred::Ready(Err(err)) => return Deferred::Ready(Err(err)),
            Deferred::Pending(future) => {
                slots.push(None);
                pending.push(future.map(move |result| result.map(|value| (index, value))));
            }
        }
    }

    if pending.is_empty() {
        return Deferred::Ready(Ok(slots.into_iter().flatten().collect()));
    }

    Deferred::pending(async move {
        for (index, value) in futures::future::try_join_all(pending).await? {
            slots[index] = Some(value);
        }
        Ok(slots.into_iter().flatten().collect())
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn all_ready_is_ready() {
        let joined = join_all([Deferred::Ready(1), Deferred::Ready(2)]);

        assert_eq!(joined.into_ready().ok(), Some(vec![1, 2]));
    }

    #[tokio::test]
    async fn mixed_values_keep_their_order() {
        let joined = join_all([
            Deferred::Ready("a"),
            Deferred::pending(async { "b" }),
            Deferred::Ready("c"),
            Deferred::pending(async { "d" }),
        ]);

        assert!(joined.is_pending());
        assert_eq!(joined.await, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn ready_error_short_circuits() {
        let joined = try_join_all([
            Deferred::pending(async { Ok::<_, &str>(1) }),
            Deferred::Ready(Err("nope")),
        ]);

        assert_eq!(joined.into_ready().ok(), Some(Err("nope")));
    }

    #[tokio::test]
    async fn pending_error_is_returned() {
        let joined = try_join_all([
            Deferred::Ready(Ok(1)),
            Deferred::pending(async { Err::<i32, _>("late failure") }),
        ]);

        assert_eq!(joined.await, Err("late failure"));
    }

    #[test]
    fn empty_input_is_ready() {
        let joined = try_join_all(Vec::<Deferred<Result<u8, ()>>>::new());

        assert_eq!(joined.into_ready().ok(), Some(Ok(Vec::new())));
    }
}
