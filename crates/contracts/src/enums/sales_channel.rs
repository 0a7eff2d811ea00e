use serde::{Deserialize, Serialize};

/// Sales channels an order line can belong to.
///
/// Channel-keyed API output only carries the four named channels;
/// `Other` exists for per-line classification and is invisible in
/// channel breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SalesChannel {
    Douyin,
    Tmall,
    Youzan,
    Jd,
    Other,
}

impl SalesChannel {
    /// Stable key used in JSON field names (`douyin_orders`, ...).
    pub fn key(&self) -> &'static str {
        match self {
            SalesChannel::Douyin => "douyin",
            SalesChannel::Tmall => "tmall",
            SalesChannel::Youzan => "youzan",
            SalesChannel::Jd => "jd",
            SalesChannel::Other => "other",
        }
    }

    /// Human-readable name as it appears in the source exports.
    pub fn display_name(&self) -> &'static str {
        match self {
            SalesChannel::Douyin => "抖音",
            SalesChannel::Tmall => "天猫",
            SalesChannel::Youzan => "有赞",
            SalesChannel::Jd => "京东",
            SalesChannel::Other => "其他",
        }
    }

    /// The four channels that appear in channel-keyed output.
    pub fn named() -> [SalesChannel; 4] {
        [
            SalesChannel::Douyin,
            SalesChannel::Tmall,
            SalesChannel::Youzan,
            SalesChannel::Jd,
        ]
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "douyin" => Some(SalesChannel::Douyin),
            "tmall" => Some(SalesChannel::Tmall),
            "youzan" => Some(SalesChannel::Youzan),
            "jd" => Some(SalesChannel::Jd),
            "other" => Some(SalesChannel::Other),
            _ => None,
        }
    }
}
