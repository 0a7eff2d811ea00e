pub mod sales_channel;

pub use sales_channel::SalesChannel;
