// ============================================================================
// spark-effects - Ergonomic Macros
// ============================================================================

/// Clone variables into a move closure.
///
/// Hooks hand many closures to the host, each needing its own copy of a
/// signal, a liveness flag or a weak host reference.
///
/// ```rust
/// use spark_effects::{cloned, signal};
///
/// let a = signal(1);
/// let double = cloned!(a => move || a.get() * 2);
/// a.set(4);
/// assert_eq!(double(), 8);
/// ```
#[macro_export]
macro_rules! cloned {
    ($($n:ident),+ => $e:expr) => {
        {
            $( let $n = $n.clone(); )+
            $e
        }
    };
}
