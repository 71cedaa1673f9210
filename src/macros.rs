/// Consumes `$collection` through rayon when the `parallel` feature is on, sequentially otherwise.
macro_rules! into_iter_if_parallel {
    ($collection:expr) => {{
        #[cfg(feature = "parallel")]
        let iter = $collection.into_par_iter();
        #[cfg(not(feature = "parallel"))]
        let iter = $collection.into_iter();
        iter
    }};
}
