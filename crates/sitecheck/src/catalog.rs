//! The Encer storefront scenario set.
//!
//! Fixture tables for the live site and the builders that turn them into a
//! [`ScenarioRegistry`]. Every scenario starts from a fresh navigation, so
//! the ones that share a page (the three tab checks appear once per product
//! block) collapse into one registration.

use crate::assertion::{LocationMatch, TextMatch};
use crate::config::Viewport;
use crate::form::{FormField, FormSubmission};
use crate::locator::Locator;
use crate::result::HarnessResult;
use crate::scenario::{Scenario, ScenarioRegistry};
use crate::step::Step;
use crate::toggle::ToggleCheck;

/// Production storefront
pub const DEFAULT_BASE_URL: &str = "https://encer.store";

/// Calendly link behind every "Schedule Consultation" button
pub const CONSULTATION_URL: &str =
    "https://calendly.com/encer-schedule/free-30min-encer-consultation-clone-clone";

/// Chat widgets hidden before checking the side cart
pub const CHAT_WIDGET_IDS: &[&str] = &["zsiq_maintitle", "titlediv"];

/// Phone number typed into every form
pub const TEST_PHONE: &str = "201-555-0123";

/// Email typed into every form
pub const TEST_EMAIL: &str = "qa@example.com";

/// A homepage call-to-action button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CtaButton {
    /// Button selector
    pub selector: &'static str,
    /// Text the button must contain
    pub label: &'static str,
    /// Path the click must land on
    pub path: &'static str,
}

/// Homepage CTA buttons
pub const CTA_BUTTONS: &[CtaButton] = &[
    CtaButton {
        selector: r#"[data-id="b332b3e"] .elementor-button"#,
        label: "Start Your Journey – 100% Risk-Free!",
        path: "/product/encer-balance-2-pack/",
    },
    CtaButton {
        selector: r#"[data-id="26e91dad"] .elementor-button"#,
        label: "RECLAIM YOUR ENERGY TODAY!",
        path: "/product/encer-balance-2-pack/",
    },
    CtaButton {
        selector: r#"[data-id="4cc297fe"] .elementor-button"#,
        label: "Get Encer now",
        path: "/product/encer-balance-2-pack/",
    },
    CtaButton {
        selector: r#"[data-id="637f9598"] .elementor-button"#,
        label: "Learn More",
        path: "/financing/",
    },
];

/// A labelled link and the path (or href fragment) it must point to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkCheck {
    /// Visible label
    pub label: &'static str,
    /// Expected path
    pub path: &'static str,
}

/// Footer and info links
pub const FOOTER_LINKS: &[LinkCheck] = &[
    LinkCheck {
        label: "Money Back Guarantee and Return Policy",
        path: "/refund-policy/",
    },
    LinkCheck {
        label: "Privacy Policy",
        path: "/privacy-policy/",
    },
    LinkCheck {
        label: "T&Cs",
        path: "/terms-and-conditions/",
    },
    LinkCheck {
        label: "Blog",
        path: "/blog/",
    },
    LinkCheck {
        label: "Financing",
        path: "/financing/",
    },
    LinkCheck {
        label: "Download Research",
        path: "/about/#downSection",
    },
];

/// Desktop menu entries; labels match case-insensitively
pub const MENU_LINKS: &[LinkCheck] = &[
    LinkCheck {
        label: "About Encer",
        path: "/about/",
    },
    LinkCheck {
        label: "Contact Us",
        path: "/contact-us/",
    },
    LinkCheck {
        label: "FAQ",
        path: "/#FAQsec1",
    },
    LinkCheck {
        label: "BALANCE TREATMENT",
        path: "/product/encer-balance-1-month-treatment/",
    },
    LinkCheck {
        label: "BOOST TREATMENT",
        path: "/product/encer-balance-2-pack/",
    },
    LinkCheck {
        label: "HARMONY TREATMENT",
        path: "/product/encer-boost-4-pack/",
    },
];

/// Numeric suffixes of the FAQ accordion items
pub const FAQ_ITEMS: std::ops::RangeInclusive<u32> = 1321..=1327;

/// A product page and its side-cart expectations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Product {
    /// Short key used in tags
    pub key: &'static str,
    /// Display name used in scenario names
    pub name: &'static str,
    /// Page path
    pub path: &'static str,
    /// Substring of the product title
    pub title: &'static str,
    /// Price node selector
    pub price_selector: &'static str,
    /// Exact price text
    pub price: &'static str,
    /// `data-id` of the ORDER NOW widget
    pub order_id: &'static str,
    /// Side-cart item title
    pub cart_title: &'static str,
    /// Side-cart subtotal substring
    pub subtotal: &'static str,
}

impl Product {
    /// The ORDER NOW button
    #[must_use]
    pub fn order_button(&self) -> String {
        format!(
            r#"[data-id="{}"] button.single_add_to_cart_button"#,
            self.order_id
        )
    }
}

/// Product pages
pub const PRODUCTS: &[Product] = &[
    Product {
        key: "balance",
        name: "ENCER BALANCE TREATMENT",
        path: "/product/encer-balance-1-month-treatment/",
        title: "ENCER Balance",
        price_selector: "div.elementor-element-eb72630 .elementor-heading-title",
        price: "$79.00",
        order_id: "7f69d2d8",
        cart_title: "ENCER BALANCE 1 month treatment",
        subtotal: "$79.90",
    },
    Product {
        key: "boost",
        name: "ENCER BOOST TREATMENT",
        path: "/product/encer-balance-2-pack/",
        title: "ENCER Boost Treatment",
        price_selector: "div.elementor-element-56a9c5b5 .elementor-heading-title",
        price: "$149.90",
        order_id: "64f2aaff",
        cart_title: "ENCER BOOST 2 months treatment",
        subtotal: "$149.90",
    },
    Product {
        key: "harmony",
        name: "ENCER HARMONY TREATMENT",
        path: "/product/encer-boost-4-pack/",
        title: "Harmony Support Treatment",
        price_selector: "div.elementor-element-523a1d9f .elementor-heading-title",
        price: "$290.00",
        order_id: "b3ca033",
        cart_title: "Encer HARMONY 4 months treatment",
        subtotal: "$290",
    },
];

/// Page hosting the product tabs
pub const TABS_PAGE: &str = "/product/encer-balance-1-month-treatment/";

/// A product tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabCheck {
    /// Tab name
    pub name: &'static str,
    /// Element id suffix shared by title and content
    pub id: &'static str,
    /// Text the content panel must contain
    pub content: &'static str,
}

/// Product tabs on [`TABS_PAGE`]
pub const TABS: &[TabCheck] = &[
    TabCheck {
        name: "Description",
        id: "21182764721",
        content: "Package Quantity",
    },
    TabCheck {
        name: "Ingredients",
        id: "21182764722",
        content: "INGREDIENTS",
    },
    TabCheck {
        name: "Reviews",
        id: "21182764723",
        content: "",
    },
];

/// Reviewer names listed under the Reviews tab
pub const REVIEWERS: &[&str] = &["Grace", "Desmond", "Daisy"];

/// Account used by the login scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Username or email
    pub user: String,
    /// Password
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            user: TEST_EMAIL.to_string(),
            password: "change-me".to_string(),
        }
    }
}

/// The storefront scenario set with placeholder login credentials
pub fn storefront(base_url: &str) -> HarnessResult<ScenarioRegistry> {
    storefront_with_login(base_url, &Credentials::default())
}

/// The storefront scenario set
pub fn storefront_with_login(
    base_url: &str,
    credentials: &Credentials,
) -> HarnessResult<ScenarioRegistry> {
    let site = Site::new(base_url);
    let mut registry = ScenarioRegistry::new();
    registry.register_all(homepage(&site))?;
    registry.register_all(account(&site, credentials))?;
    registry.register_all(forms(&site))?;
    registry.register_all(navigation(&site))?;
    for product in PRODUCTS {
        registry.register_all(product_scenarios(&site, product))?;
        // each product block re-runs the tab checks on the same page
        registry.register_all(tab_scenarios(&site))?;
    }
    Ok(registry)
}

struct Site {
    base: String,
}

impl Site {
    fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn page(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    fn home(&self) -> String {
        self.page("/")
    }
}

fn homepage(site: &Site) -> Vec<Scenario> {
    let hero = Scenario::new("Homepage hero", site.home())
        .tag("home")
        .step(Step::Locate {
            locator: Locator::new("h2")
                .with_text("Reclaim Your Energy with Encer Treatment")
                .first(),
        });

    let mut cta = Scenario::new("CTA buttons", site.home()).tag("home").tag("cta");
    for button in CTA_BUTTONS {
        let locator = Locator::new(button.selector).with_timeout(10_000);
        cta = cta
            .expect_visible(locator.clone())
            .expect_text(locator.clone(), TextMatch::contains(button.label.trim()))
            .click(locator)
            .step(Step::AssertLocation {
                matcher: LocationMatch::PathIncludes(button.path.to_string()),
                timeout_ms: Some(10_000),
            })
            .step(Step::GoBack)
            .step(Step::WaitFixed { ms: 1000 });
    }

    let mut faq = Scenario::new("FAQ items expand", site.home())
        .tag("home")
        .tag("faq");
    for item in FAQ_ITEMS {
        faq = faq
            .click(Locator::new(format!("#elementor-tab-title-{item}")).with_timeout(10_000))
            .expect_visible(Locator::new(format!("#elementor-tab-content-{item}")).with_timeout(10_000))
            .step(Step::WaitFixed { ms: 500 });
    }

    vec![hero, cta, faq]
}

fn log_in_button() -> Locator {
    Locator::new(r#"[data-id="76de71d"] a.elementor-button"#).with_text("LOG IN")
}

fn account(site: &Site, credentials: &Credentials) -> Vec<Scenario> {
    let schedule = Locator::new(r#"[data-id="875fcc7"] a.elementor-button"#);
    let consultation = Scenario::new("Schedule Consultation button", site.home())
        .tag("home")
        .tag("cta")
        .viewport(Viewport::WIDE_DESKTOP)
        .ignoring_page_errors()
        .expect_visible(schedule.clone())
        .expect_attribute(schedule.clone(), "href", TextMatch::equals(CONSULTATION_URL))
        .expect_attribute(schedule.clone(), "target", TextMatch::equals("_blank"))
        .expect_text(schedule, TextMatch::contains("Schedule Consultation"));

    let log_in = Scenario::new("LOG IN button", site.home())
        .tag("home")
        .tag("login")
        .viewport(Viewport::WIDE_DESKTOP)
        .ignoring_page_errors()
        .expect_attribute(log_in_button(), "href", TextMatch::equals("/my-account"))
        .expect_visible(log_in_button())
        .click(log_in_button())
        .step(Step::AssertLocation {
            matcher: LocationMatch::PathMatches(r"^/my-account/?$".to_string()),
            timeout_ms: Some(10_000),
        });

    let username = Locator::new("#username").with_timeout(10_000);
    let password = Locator::new("#password");
    let submit = Locator::new(r#"button[name="login"]"#);
    let login_form = Scenario::new("Login form", site.home())
        .tag("login")
        .tag("form")
        .ignoring_page_errors()
        .expect_attribute(log_in_button(), "href", TextMatch::equals("/my-account"))
        .expect_visible(log_in_button())
        .click(log_in_button())
        .expect_location(LocationMatch::PathIncludes("/my-account".to_string()))
        .expect_visible(username.clone())
        .step(Step::TypeText {
            locator: username,
            text: credentials.user.clone(),
        })
        .expect_visible(password.clone())
        .step(Step::TypeText {
            locator: password,
            text: credentials.password.clone(),
        })
        .expect_visible(submit.clone())
        .click(submit);

    vec![consultation, log_in, login_form]
}

fn response_banner() -> Locator {
    Locator::new(".forminator-response-message")
        .with_timeout(10_000)
        .first_visible()
}

fn forms(site: &Site) -> Vec<Scenario> {
    let newsletter = FormSubmission::new(
        Locator::new("#forminator-module-14845").with_timeout(30_000),
        Locator::new("#forminator-module-14845 button.forminator-button-submit").with_text("Send"),
    )
    .revealed()
    .field(FormField::text(
        Locator::new(r#"#forminator-module-14845 input[name="name-1-first-name"]"#),
        "Test",
    ))
    .field(FormField::text(
        Locator::new(r#"#forminator-module-14845 input[name="name-1-last-name"]"#),
        "User",
    ))
    .field(FormField::text(
        Locator::new(r#"#forminator-module-14845 input[name="email-1"]"#),
        TEST_EMAIL,
    ))
    .field(FormField::text(
        Locator::new(
            r#"#forminator-module-14845 input[name="phone-1"], #forminator-module-14851 input.iti__tel-input"#,
        )
        .first_visible(),
        TEST_PHONE,
    ))
    .response(response_banner());

    let about_submit =
        Locator::new("#forminator-module-14851 button.forminator-button.forminator-button-submit");
    let research = FormSubmission::new(
        Locator::new("#forminator-module-14851").with_timeout(30_000),
        about_submit.clone(),
    )
    .revealed()
    .field(FormField::text(
        Locator::new(r#"#forminator-module-14851 input[name="name-1"]"#),
        "Test only",
    ))
    .field(FormField::text(
        Locator::new(r#"#forminator-module-14851 input[name="email-1"]"#),
        TEST_EMAIL,
    ))
    .field(FormField::text(
        Locator::new(
            r#"#forminator-module-14851 input[name="phone-1"], #forminator-module-14851 input.iti__tel-input"#,
        )
        .first_visible(),
        TEST_PHONE,
    ))
    .submit_label("Download research");

    let scope = r#"form[class*="forminator-custom-form"]"#;
    let in_form = |rest: &str| Locator::new(format!("{scope} {rest}")).first_visible();
    let contact = FormSubmission::new(
        Locator::new(scope).with_timeout(30_000).first_visible(),
        in_form("button.forminator-button-submit"),
    )
    .field(FormField::text(in_form(r#"input[name="name-3-first-name"]"#), "Test"))
    .field(FormField::text(in_form(r#"input[name="name-3-last-name"]"#), "User"))
    .field(FormField::text(in_form(r#"input[name="email-1"]"#), TEST_EMAIL))
    .field(FormField::phone(in_form("input.iti__tel-input"), TEST_PHONE))
    .field(FormField::checkbox(in_form(
        r#"input[type="checkbox"][name="checkbox-1[]"]"#,
    )))
    .detect_recaptcha()
    .response(response_banner());

    vec![
        Scenario::new("Newsletter form", site.home())
            .tag("home")
            .tag("form")
            .ignoring_page_errors()
            .step(Step::SubmitForm(newsletter)),
        Scenario::new("About heading", site.page("/about/"))
            .tag("about")
            .ignoring_page_errors()
            .expect_visible(
                Locator::new("h1.elementor-heading-title.elementor-size-default").with_timeout(10_000),
            )
            .expect_text(
                "h1.elementor-heading-title.elementor-size-default",
                TextMatch::normalized("about encer"),
            ),
        Scenario::new("Download research form", site.page("/about/"))
            .tag("about")
            .tag("form")
            .ignoring_page_errors()
            .step(Step::AssertCount {
                locator: about_submit,
                count: 1,
            })
            .step(Step::SubmitForm(research)),
        Scenario::new("Contact heading", site.page("/contact-us/"))
            .tag("contact")
            .ignoring_page_errors()
            .step(Step::Locate {
                locator: Locator::new("h1").with_text("We’d love to hear from you").first(),
            }),
        Scenario::new("Contact form", site.page("/contact-us/"))
            .tag("contact")
            .tag("form")
            .ignoring_page_errors()
            .step(Step::SubmitForm(contact)),
    ]
}

fn navigation(site: &Site) -> Vec<Scenario> {
    let mut scenarios: Vec<Scenario> = FOOTER_LINKS
        .iter()
        .map(|link| {
            let locator = Locator::new("a").with_text(link.label).first();
            Scenario::new(format!("Footer link: {}", link.label), site.home())
                .tag("footer")
                .expect_visible(locator.clone())
                .expect_attribute(locator.clone(), "href", TextMatch::contains(link.path))
                .click(locator)
                .expect_location(LocationMatch::PathIncludes(link.path.to_string()))
        })
        .collect();

    let amazon = Locator::new(r#"a[href*="amazon.com"]"#).first();
    scenarios.extend([
        Scenario::new("Header logo and menu", site.home())
            .tag("header")
            .expect_visible(Locator::new(r#"img[alt=""]"#).first())
            .expect_visible("#menu-1-dcaf759"),
        Scenario::new("Buy Encer submenu", site.home())
            .tag("header")
            .click(Locator::new("a.has-submenu").with_text("Buy Encer").first())
            .expect_visible(Locator::new("ul.sub-menu").first_visible()),
        Scenario::new("Header nav links", site.home())
            .tag("header")
            .expect_attribute(
                Locator::new("a").with_text("About Encer").first(),
                "href",
                TextMatch::contains("/about"),
            )
            .expect_attribute(
                Locator::new("a").with_text("Contact Us").first(),
                "href",
                TextMatch::contains("/contact-us"),
            )
            .expect_attribute(
                Locator::new("a").with_text("FAQ").first(),
                "href",
                TextMatch::contains("#FAQsec1"),
            ),
        Scenario::new("Header consultation and login", site.home())
            .tag("header")
            .expect_visible(Locator::new("a").with_text("Schedule Consultation").first())
            .expect_visible(Locator::new(r#"a[href*="/my-account"]"#).first()),
        Scenario::new("Amazon store link", site.home())
            .tag("header")
            .expect_visible(amazon)
            .step(Step::Locate {
                locator: Locator::new(r#"a[href*="amazon.com"] img[alt="Amazon Store"]"#).first(),
            }),
    ]);

    let mut menu = Scenario::new("Desktop menu links", site.home())
        .tag("header")
        .tag("menu");
    for link in MENU_LINKS {
        menu = menu.expect_attribute(
            Locator::new("a").with_text_ignore_case(link.label).first(),
            "href",
            TextMatch::contains(link.path.trim_start_matches('/')),
        );
    }
    scenarios.push(menu);
    scenarios
}

fn product_scenarios(site: &Site, product: &Product) -> Vec<Scenario> {
    let url = site.page(product.path);
    let title = Locator::new("div.product h1").with_timeout(30_000);
    let price = Locator::new(product.price_selector).with_timeout(30_000);
    let add_to_cart = Locator::new("form.cart button.single_add_to_cart_button")
        .with_timeout(20_000)
        .first();

    let details = Scenario::new(format!("{} details", product.name), url.clone())
        .tag("product")
        .tag(product.key)
        .ignoring_page_errors()
        .expect_visible(title.clone())
        .step(Step::LogText {
            locator: title.clone(),
            label: "Product title".to_string(),
        })
        .expect_text(title, TextMatch::contains(product.title))
        .expect_visible(price.clone())
        .expect_text(price, TextMatch::equals(product.price))
        .expect_visible(add_to_cart.clone())
        .expect_text(
            add_to_cart,
            TextMatch::ContainsAny(vec!["add".to_string(), "order".to_string()]),
        );

    let order = Locator::new(product.order_button()).with_timeout(20_000);
    let checkout = Locator::new(".cfw-primary-btn").with_timeout(10_000);
    let side_cart = Scenario::new(format!("{} side cart", product.name), url.clone())
        .tag("product")
        .tag("cart")
        .tag(product.key)
        .ignoring_page_errors()
        .expect_visible(order.clone())
        .expect_text(order.clone(), TextMatch::contains("ORDER NOW"))
        .click(order)
        .expect_visible(Locator::new("#cfw-side-cart").with_timeout(20_000))
        .expect_text(".cfw-cart-item-title span", TextMatch::contains(product.cart_title))
        .expect_text(
            ".cfw-cart-item-subtotal .woocommerce-Price-amount",
            TextMatch::contains(product.subtotal),
        )
        .expect_text(".cfw-side-cart-quantity", TextMatch::contains("1"))
        .step(Step::HideElements {
            ids: CHAT_WIDGET_IDS.iter().map(|id| (*id).to_string()).collect(),
        })
        .step(Step::ClickIfVisible {
            locator: Locator::new(".cky-btn-accept").first_visible(),
        })
        .expect_visible(checkout.clone())
        .expect_text(checkout, TextMatch::contains("Proceed to checkout"));

    let consultation = Scenario::new(format!("{} consultation link", product.name), url.clone())
        .tag("product")
        .tag(product.key)
        .expect_attribute(
            "#btn-sched-consultation",
            "href",
            TextMatch::equals(CONSULTATION_URL),
        );

    let toggle = Scenario::new(format!("{} VIEW ALL toggle", product.name), url)
        .tag("product")
        .tag("toggle")
        .tag(product.key)
        .ignoring_page_errors()
        .step(Step::Toggle(ToggleCheck::new(
            Locator::new("#btn-view-all-content").with_timeout(10_000),
            "view all",
            "hide",
        )));

    vec![details, side_cart, consultation, toggle]
}

fn tab_scenarios(site: &Site) -> Vec<Scenario> {
    let url = site.page(TABS_PAGE);
    TABS.iter()
        .enumerate()
        .map(|(i, tab)| {
            let title = Locator::new(format!("#e-n-tab-title-{}", tab.id));
            let content = Locator::new(format!("#e-n-tab-content-{}", tab.id));
            let selected = TextMatch::equals("true");
            let mut scenario = Scenario::new(format!("{} tab", tab.name), url.clone())
                .tag("product")
                .tag("tabs")
                .ignoring_page_errors();
            // the first tab is selected on load; the others only after a click
            scenario = if i == 0 {
                scenario
                    .expect_attribute(title.clone(), "aria-selected", selected)
                    .click(title)
            } else {
                scenario
                    .click(title.clone())
                    .expect_attribute(title, "aria-selected", selected)
            };
            scenario = scenario.expect_visible(content.clone());
            if tab.content.is_empty() {
                for reviewer in REVIEWERS {
                    scenario = scenario.step(Step::Locate {
                        locator: Locator::new(format!("#e-n-tab-content-{} .review-name", tab.id))
                            .with_text(*reviewer)
                            .first(),
                    });
                }
                scenario
            } else {
                scenario.expect_text(content, TextMatch::contains(tab.content))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ScenarioRegistry {
        storefront(DEFAULT_BASE_URL).unwrap()
    }

    #[test]
    fn test_tab_groups_registered_once() {
        let registry = registry();
        assert_eq!(registry.filter("tabs").count(), 3);
        let names: Vec<&str> = registry.iter().map(|s| s.name.as_str()).collect();
        let mut unique = names.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_expected_scenarios_present() {
        let registry = registry();
        for name in [
            "Homepage hero",
            "CTA buttons",
            "LOG IN button",
            "Newsletter form",
            "Contact form",
            "FAQ items expand",
            "Desktop menu links",
            "ENCER BOOST TREATMENT side cart",
            "ENCER HARMONY TREATMENT VIEW ALL toggle",
            "Reviews tab",
        ] {
            assert!(registry.get(name).is_some(), "missing scenario {name}");
        }
        assert_eq!(registry.filter("footer").count(), FOOTER_LINKS.len());
    }

    #[test]
    fn test_base_url_is_joined() {
        let registry = storefront("http://localhost:8080/").unwrap();
        let about = registry.get("About heading").unwrap();
        assert_eq!(about.url, "http://localhost:8080/about/");
        let hero = registry.get("Homepage hero").unwrap();
        assert_eq!(hero.url, "http://localhost:8080/");
    }

    #[test]
    fn test_cta_steps_per_button() {
        let registry = registry();
        let cta = registry.get("CTA buttons").unwrap();
        assert_eq!(cta.steps.len(), CTA_BUTTONS.len() * 6);
        assert!(matches!(
            &cta.steps[3],
            Step::AssertLocation { matcher: LocationMatch::PathIncludes(p), .. } if p == "/product/encer-balance-2-pack/"
        ));
    }

    #[test]
    fn test_consultation_uses_wide_viewport() {
        let registry = registry();
        let scenario = registry.get("Schedule Consultation button").unwrap();
        assert_eq!(scenario.viewport, Some(Viewport::WIDE_DESKTOP));
    }

    #[test]
    fn test_login_uses_given_credentials() {
        let credentials = Credentials {
            user: "buyer@example.com".into(),
            password: "hunter2".into(),
        };
        let registry = storefront_with_login(DEFAULT_BASE_URL, &credentials).unwrap();
        let login = registry.get("Login form").unwrap();
        let typed: Vec<&str> = login
            .steps
            .iter()
            .filter_map(|s| match s {
                Step::TypeText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(typed, vec!["buyer@example.com", "hunter2"]);
    }

    #[test]
    fn test_menu_hrefs_drop_leading_slash() {
        let registry = registry();
        let menu = registry.get("Desktop menu links").unwrap();
        assert!(matches!(
            &menu.steps[2],
            Step::AssertAttribute { matcher: TextMatch::Contains(v), .. } if v == "#FAQsec1"
        ));
    }

    #[test]
    fn test_order_button_selector() {
        assert_eq!(
            PRODUCTS[1].order_button(),
            r#"[data-id="64f2aaff"] button.single_add_to_cart_button"#
        );
    }

    #[test]
    fn test_yaml_export_reloads() {
        let registry = registry();
        let yaml = registry.to_yaml().unwrap();
        let loaded = ScenarioRegistry::from_yaml_str(&yaml).unwrap();
        assert_eq!(loaded.len(), registry.len());
    }
}
