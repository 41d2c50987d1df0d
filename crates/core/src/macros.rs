//! Call-site macros.
//!
//! Every operation comes in two forms. The plain form (`tic!`, `toc!`, …) is
//! always active. The `_gated` form is active only when this crate is built
//! with the `enable-timing` feature and otherwise expands to nothing: no
//! call, no branch, no call-site cache. Libraries instrument their internals
//! with the gated forms and leave the plain ones to applications.
//!
//! Region labels are identifiers. Each expansion declares its own static
//! [`CallSite`](crate::CallSite), so the label is looked up in the registry
//! once per call site.
//!
//! ```
//! use calltree_core::{tic, toc, finished_iteration};
//!
//! fn step() {
//!     tic!(step);
//!     tic!(linearize);
//!     // ...
//!     toc!(linearize);
//!     tic!(solve);
//!     // ...
//! } // `solve` and `step` close here
//!
//! for _ in 0..3 {
//!     step();
//!     finished_iteration!();
//! }
//! ```

/// Open a region scoped to the enclosing block, bound to a variable named
/// after the label.
#[macro_export]
macro_rules! tic {
    ($label:ident) => {
        #[allow(unused_variables)]
        let $label = {
            static CALL_SITE: $crate::CallSite = $crate::CallSite::new(stringify!($label));
            $crate::Span::enter(&CALL_SITE)
        };
    };
}

/// Close a region opened by [`tic!`] before its scope ends.
#[macro_export]
macro_rules! toc {
    ($label:ident) => {
        $label.stop()
    };
}

/// Open a region with no scope binding. Must be matched by [`long_toc!`].
#[macro_export]
macro_rules! long_tic {
    ($label:ident) => {{
        static CALL_SITE: $crate::CallSite = $crate::CallSite::new(stringify!($label));
        $crate::open_long_lived(&CALL_SITE)
    }};
}

/// Close a region opened by [`long_tic!`].
#[macro_export]
macro_rules! long_toc {
    ($label:ident) => {{
        static CALL_SITE: $crate::CallSite = $crate::CallSite::new(stringify!($label));
        $crate::close_long_lived(&CALL_SITE)
    }};
}

#[macro_export]
macro_rules! finished_iteration {
    () => {
        $crate::finished_iteration()
    };
}

#[macro_export]
macro_rules! print_timing {
    () => {
        $crate::print()
    };
}

/// Print with mean, standard deviation and percentage of parent.
#[macro_export]
macro_rules! print_timing_stats {
    () => {
        $crate::print_stats()
    };
}

#[macro_export]
macro_rules! reset_timing {
    () => {
        $crate::reset()
    };
}

#[cfg(feature = "enable-timing")]
mod gated {
    #[macro_export]
    macro_rules! tic_gated {
        ($label:ident) => {
            $crate::tic!($label)
        };
    }

    #[macro_export]
    macro_rules! toc_gated {
        ($label:ident) => {
            $crate::toc!($label)
        };
    }

    #[macro_export]
    macro_rules! long_tic_gated {
        ($label:ident) => {
            $crate::long_tic!($label)
        };
    }

    #[macro_export]
    macro_rules! long_toc_gated {
        ($label:ident) => {
            $crate::long_toc!($label)
        };
    }

    #[macro_export]
    macro_rules! finished_iteration_gated {
        () => {
            $crate::finished_iteration()
        };
    }

    #[macro_export]
    macro_rules! print_timing_gated {
        () => {
            $crate::print()
        };
    }

    #[macro_export]
    macro_rules! print_timing_stats_gated {
        () => {
            $crate::print_stats()
        };
    }

    #[macro_export]
    macro_rules! reset_timing_gated {
        () => {
            $crate::reset()
        };
    }
}

#[cfg(not(feature = "enable-timing"))]
mod gated {
    #[macro_export]
    macro_rules! tic_gated {
        ($label:ident) => {};
    }

    #[macro_export]
    macro_rules! toc_gated {
        ($label:ident) => {};
    }

    #[macro_export]
    macro_rules! long_tic_gated {
        ($label:ident) => {};
    }

    #[macro_export]
    macro_rules! long_toc_gated {
        ($label:ident) => {};
    }

    #[macro_export]
    macro_rules! finished_iteration_gated {
        () => {};
    }

    #[macro_export]
    macro_rules! print_timing_gated {
        () => {};
    }

    #[macro_export]
    macro_rules! print_timing_stats_gated {
        () => {};
    }

    #[macro_export]
    macro_rules! reset_timing_gated {
        () => {};
    }
}
