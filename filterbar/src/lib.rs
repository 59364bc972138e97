pub mod config;
pub mod drag;
pub mod error;
pub mod filters;
pub mod gate;
pub mod geometry;
pub mod host;
pub mod resize;
pub mod scroller;
pub mod signal;
pub mod sync;

pub use config::{Breakpoint, BreakpointTable, Config, Preset, Readiness};
pub use drag::{DragController, DragInput, DragSession, DragState};
pub use error::{ConfigError, FilterDataError};
pub use filters::{
    Camera, Category, FilterData, FilterItem, FilterQuery, FilterSelection, FilterView,
    SettingValue, Tag, build_categories,
};
pub use gate::{GateState, InitializationGate};
pub use geometry::{GeometryCalculator, GeometrySnapshot};
pub use host::{Environment, HandleStyle, Host, Measurements, Surface};
pub use resize::ResizeListener;
pub use scroller::{FilterScroller, Lifecycle};
pub use signal::{Dispatcher, GlobalEvent, InstanceId, Signal, TimerId};
pub use sync::{ScrollProgress, content_offset_to_handle_left, drag_offset_to_content_offset};
