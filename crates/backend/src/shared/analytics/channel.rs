use contracts::enums::SalesChannel;

/// Douyin storefronts appear under three different markers in the
/// exports (the platform itself, its news-feed shops and its ad tool).
const DOUYIN_MARKERS: [&str; 3] = ["抖音", "今日头条", "鲁班"];
const TMALL_MARKER: &str = "天猫";
const YOUZAN_MARKER: &str = "有赞";
const JD_MARKER: &str = "京东";

/// Classify a free-text shop type into a sales channel.
///
/// Substring containment, first match wins. The markers are not
/// mutually exclusive in the wild, so the precedence order
/// (Douyin > Tmall > Youzan > JD) is part of the contract, not an
/// optimization. Missing shop type classifies as Other.
pub fn classify(shop_type: Option<&str>) -> SalesChannel {
    let shop_type = match shop_type {
        Some(s) => s,
        None => return SalesChannel::Other,
    };

    if DOUYIN_MARKERS.iter().any(|m| shop_type.contains(m)) {
        SalesChannel::Douyin
    } else if shop_type.contains(TMALL_MARKER) {
        SalesChannel::Tmall
    } else if shop_type.contains(YOUZAN_MARKER) {
        SalesChannel::Youzan
    } else if shop_type.contains(JD_MARKER) {
        SalesChannel::Jd
    } else {
        SalesChannel::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_douyin_markers_all_map_to_douyin() {
        assert_eq!(classify(Some("抖音小店")), SalesChannel::Douyin);
        assert_eq!(classify(Some("今日头条放心购")), SalesChannel::Douyin);
        assert_eq!(classify(Some("鲁班电商")), SalesChannel::Douyin);
    }

    #[test]
    fn test_named_channels() {
        assert_eq!(classify(Some("天猫旗舰店")), SalesChannel::Tmall);
        assert_eq!(classify(Some("有赞微商城")), SalesChannel::Youzan);
        assert_eq!(classify(Some("京东POP")), SalesChannel::Jd);
    }

    #[test]
    fn test_precedence_first_match_wins() {
        // Contains both a Douyin marker and the Tmall marker.
        assert_eq!(classify(Some("抖音天猫联合店")), SalesChannel::Douyin);
        // Tmall beats JD when both appear.
        assert_eq!(classify(Some("天猫京东分销")), SalesChannel::Tmall);
    }

    #[test]
    fn test_unknown_and_missing_are_other() {
        assert_eq!(classify(Some("拼多多")), SalesChannel::Other);
        assert_eq!(classify(Some("")), SalesChannel::Other);
        assert_eq!(classify(None), SalesChannel::Other);
    }
}
