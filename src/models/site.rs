use serde::{ Serialize, Deserialize };

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AboutItem {
    pub heading: String,
    pub paragraph: String,
    pub link: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlanPrice {
    pub monthly: u32,
    pub yearly: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlanFeatures {
    pub profiles: String,
    pub posts: String,
    pub templates: String,
    pub view: String,
    pub support: String,
}

impl PlanFeatures {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [&self.profiles, &self.posts, &self.templates, &self.view, &self.support]
            .into_iter()
            .map(String::as_str)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Plan {
    pub heading: String,
    pub price: PlanPrice,
    pub user: String,
    pub features: PlanFeatures,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FooterSection {
    pub section: String,
    pub links: Vec<NavLink>,
}

/// The blob served verbatim by `GET /api/data`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SiteData {
    #[serde(rename = "headerData")]
    pub header_data: Vec<NavLink>,
    #[serde(rename = "Aboutdata")]
    pub about_data: Vec<AboutItem>,
    #[serde(rename = "PlansData")]
    pub plans_data: Vec<Plan>,
    #[serde(rename = "FooterLinksData")]
    pub footer_links_data: Vec<FooterSection>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Hero {
    pub badge: String,
    pub title_tifinagh: String,
    pub title: String,
    pub lead: String,
    pub primary_cta: String,
    pub secondary_cta: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Stat {
    pub value: String,
    pub label: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AboutSection {
    pub kicker: String,
    pub title: String,
    pub intro: String,
    pub features: Vec<AboutItem>,
    pub stats: Vec<Stat>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Testimonial {
    pub quote: String,
    pub body: String,
    pub author: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FaqSection {
    pub kicker: String,
    pub title: String,
    pub items: Vec<Faq>,
    pub contact_email: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JoinSection {
    pub kicker: String,
    pub title: String,
    pub body: String,
    pub members: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HomeContent {
    pub title: String,
    pub description: String,
    pub hero: Hero,
    pub about: AboutSection,
    pub dedicated: Testimonial,
    pub faq: FaqSection,
    pub join: JoinSection,
    pub copyright: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SiteContent {
    pub data: SiteData,
    pub home: HomeContent,
}
