mod descriptor;
mod pool;

pub use descriptor::{
    LabelAnchor, LabelDescriptor, LabelStyle, LeaderLine, format_label_value, pie_label_key,
    series_label_key,
};
pub use pool::{LabelController, LabelHandle, LabelPool};
