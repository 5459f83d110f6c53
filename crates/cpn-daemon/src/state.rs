//! Shared runtime state for cpn-daemon.
//!
//! Handlers receive `State<Arc<AppState>>` from Axum; this module owns
//! nothing async itself. The store lives behind the service handle.

use std::sync::Arc;

use cpn_service::CouponService;
use cpn_store::CouponStore;

// ---------------------------------------------------------------------------
// BuildInfo
// ---------------------------------------------------------------------------

/// Static build metadata included in health responses.
#[derive(Clone, Debug)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Shared handle for all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Coupon orchestration over the configured store.
    pub service: CouponService,
    /// Static build metadata.
    pub build: BuildInfo,
}

impl AppState {
    pub fn new(store: Arc<dyn CouponStore>) -> Self {
        Self {
            service: CouponService::new(store),
            build: BuildInfo {
                service: "cpn-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
        }
    }
}
