// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::Url;

/// 需要浏览器渲染的特殊站点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteRule {
    Twitter,
    Pinterest,
    Instagram,
    LinkedIn,
    Facebook,
}

/// 站点规则对应的元素提取目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementTarget {
    /// 容器的若干直接子元素文本，按换行拼接
    Children {
        container: &'static str,
        skip: usize,
        take: usize,
    },
    /// 单个元素的文本
    Single(&'static str),
    /// 标题元素加正文元素，中间空一行
    HeadlineAndBody {
        headline: &'static str,
        body: &'static str,
    },
}

/// 域名到站点规则的有序表，按主机名后缀匹配
const SPECIAL_SITES: &[(&str, SiteRule)] = &[
    ("linkedin.com", SiteRule::LinkedIn),
    ("instagram.com", SiteRule::Instagram),
    ("facebook.com", SiteRule::Facebook),
    ("pinterest.com", SiteRule::Pinterest),
    ("twitter.com", SiteRule::Twitter),
    ("x.com", SiteRule::Twitter),
];

/// 未匹配到目标元素时的整页回退选择器
pub const FALLBACK_SELECTOR: &str = "body";

impl SiteRule {
    /// 根据URL查找站点规则，普通站点返回 None
    pub fn for_url(url: &str) -> Option<SiteRule> {
        let host = Url::parse(url).ok()?.host_str()?.to_ascii_lowercase();
        SPECIAL_SITES
            .iter()
            .find(|(domain, _)| {
                host == *domain
                    || host
                        .strip_suffix(*domain)
                        .is_some_and(|prefix| prefix.ends_with('.'))
            })
            .map(|(_, rule)| *rule)
    }

    pub fn target(&self) -> ElementTarget {
        match self {
            SiteRule::Twitter => ElementTarget::Children {
                container: ".css-1dbjc4n.r-1ifxtd0.r-ymttw5.r-ttdzmv",
                skip: 1,
                take: 3,
            },
            SiteRule::Pinterest => ElementTarget::Children {
                container: ".Jea.KS5.a3i.jzS.zI7.iyn.Hsu",
                skip: 1,
                take: 3,
            },
            SiteRule::Instagram => ElementTarget::Single("._aa_c"),
            SiteRule::LinkedIn => ElementTarget::Single(".scaffold-layout__main"),
            SiteRule::Facebook => ElementTarget::HeadlineAndBody {
                headline: "h1",
                body: ".x1yztbdb",
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SiteRule::Twitter => "twitter",
            SiteRule::Pinterest => "pinterest",
            SiteRule::Instagram => "instagram",
            SiteRule::LinkedIn => "linkedin",
            SiteRule::Facebook => "facebook",
        }
    }
}
