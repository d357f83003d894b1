//! Storefront scenarios from the catalog, run against a scripted copy of the
//! site.

use sitecheck::catalog::{self, DEFAULT_BASE_URL, FOOTER_LINKS, PRODUCTS};
use sitecheck::{
    ClickEffect, ErrorFilter, HarnessConfig, MockDriver, MockElement, MockPage, Outcome, Scenario,
    ScenarioRegistry, ScenarioRunner, DEFAULT_COMMAND_TIMEOUT_MS,
};

const SITE_KEY: &str = "6LcTestSiteKey";

fn url(path: &str) -> String {
    format!("{DEFAULT_BASE_URL}{path}")
}

fn registry() -> ScenarioRegistry {
    catalog::storefront(DEFAULT_BASE_URL).unwrap()
}

fn home() -> MockPage {
    home_with_dead_link("")
}

/// Home page where the link labelled `dead` has no click target
fn home_with_dead_link(dead: &str) -> MockPage {
    let mut page = MockPage::new(url("/")).element(
        MockElement::new("h2", "Reclaim Your Energy with Encer Treatment").tag("h2"),
    );
    for link in FOOTER_LINKS {
        let mut anchor = MockElement::new("a", link.label)
            .tag("a")
            .attr("href", url(link.path));
        if link.label != dead {
            anchor = anchor.on_click(ClickEffect::Navigate(link.path.to_string()));
        }
        page = page.element(anchor);
    }
    page
}

fn boost(subtotal: &str) -> MockPage {
    let product = &PRODUCTS[1];
    MockPage::new(url(product.path))
        .element(MockElement::new("div.product h1", "ENCER Boost Treatment (2 months)").tag("h1"))
        .element(MockElement::new(product.price_selector, "\n  $149.90  "))
        .element(
            MockElement::new("form.cart button.single_add_to_cart_button", " ORDER NOW ").tag("button"),
        )
        .element(
            MockElement::new(product.order_button(), "ORDER NOW")
                .tag("button")
                .on_click(ClickEffect::Show("#cfw-side-cart".into()))
                .on_click(ClickEffect::Show(".cfw-primary-btn".into())),
        )
        .element(MockElement::new("#cfw-side-cart", "").hidden())
        .element(MockElement::new(".cfw-cart-item-title span", product.cart_title))
        .element(MockElement::new(
            ".cfw-cart-item-subtotal .woocommerce-Price-amount",
            subtotal,
        ))
        .element(MockElement::new(".cfw-side-cart-quantity", "1"))
        .element(MockElement::new("#zsiq_maintitle", "Chat with us"))
        .element(
            MockElement::new(".cky-btn-accept", "Accept All")
                .on_click(ClickEffect::Hide(".cky-btn-accept".into())),
        )
        .element(MockElement::new(".cfw-primary-btn", "Proceed to checkout").hidden())
        .element(
            MockElement::new("#btn-view-all-content", "\n  VIEW ALL ")
                .on_click(ClickEffect::ToggleText("VIEW ALL".into(), "Hide".into())),
        )
        .element(
            MockElement::new("#btn-sched-consultation", "Schedule Consultation")
                .attr("href", catalog::CONSULTATION_URL),
        )
}

fn contact(with_captcha: bool) -> MockPage {
    let scope = r#"form[class*="forminator-custom-form"]"#;
    let mut page = MockPage::new(url("/contact-us/"))
        .element(MockElement::new("h1", "We’d love to hear from you").tag("h1"))
        .element(MockElement::new(scope, "").tag("form"));
    for name in ["name-3-first-name", "name-3-last-name", "email-1"] {
        page = page.element(
            MockElement::new(format!(r#"{scope} input[name="{name}"]"#), "")
                .tag("input")
                .attr("value", "stale"),
        );
    }
    page = page
        .element(MockElement::new(format!("{scope} input.iti__tel-input"), "").tag("input"))
        .element(
            MockElement::new(
                format!(r#"{scope} input[type="checkbox"][name="checkbox-1[]"]"#),
                "",
            )
            .tag("input"),
        )
        .element(
            MockElement::new(format!("{scope} button.forminator-button-submit"), "Send Message")
                .tag("button")
                .on_click(ClickEffect::Show(".forminator-response-message".into())),
        )
        .element(
            MockElement::new(".forminator-response-message", "  Thanks for contacting us! ")
                .hidden(),
        );
    if with_captcha {
        page = page.element(
            MockElement::new(r#"iframe[src*="recaptcha"]"#, "")
                .tag("iframe")
                .attr(
                    "src",
                    format!("https://www.google.com/recaptcha/api2/anchor?ar=1&k={SITE_KEY}&co=aHR0cHM6"),
                ),
        );
    }
    page
}

fn site(pages: impl IntoIterator<Item = MockPage>) -> MockDriver {
    let mut driver = MockDriver::new().with_page(home());
    for link in FOOTER_LINKS {
        driver.add_page(MockPage::new(url(link.path)));
    }
    for page in pages {
        driver.add_page(page);
    }
    driver
}

fn runner(driver: MockDriver) -> ScenarioRunner<MockDriver> {
    ScenarioRunner::new(driver, HarnessConfig::default(), ErrorFilter::default())
}

async fn run(runner: &mut ScenarioRunner<MockDriver>, registry: &ScenarioRegistry, name: &str) -> Outcome {
    let scenario = registry
        .get(name)
        .unwrap_or_else(|| panic!("no scenario named {name}"));
    runner.run(scenario).await
}

mod product_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_boost_details() {
        let registry = registry();
        let mut runner = runner(site([boost("$149.90")]));
        let outcome = run(&mut runner, &registry, "ENCER BOOST TREATMENT details").await;
        assert!(outcome.is_passed(), "{:?}", outcome.failure);
        assert_eq!(
            outcome.notes[0].message,
            "Product title: ENCER Boost Treatment (2 months)"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_now_opens_side_cart() {
        let registry = registry();
        let mut runner = runner(site([boost("$149.90")]));
        let outcome = run(&mut runner, &registry, "ENCER BOOST TREATMENT side cart").await;
        assert!(outcome.is_passed(), "{:?}", outcome.failure);

        let page = runner.driver().current_page().unwrap();
        let chat = page
            .elements
            .iter()
            .find(|e| e.selector == "#zsiq_maintitle")
            .unwrap();
        assert!(!chat.visible);
        assert!(runner
            .driver()
            .call_history
            .iter()
            .any(|c| c.starts_with("click:.cky-btn-accept")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_subtotal_reports_observed_value() {
        let registry = registry();
        let mut runner = runner(site([boost("$79.90")]));
        let outcome = run(&mut runner, &registry, "ENCER BOOST TREATMENT side cart").await;
        let failure = outcome.failure.unwrap();
        assert_eq!(failure.kind, "AssertionFailed");
        assert!(failure.message.contains("$79.90"));
        assert_eq!(failure.step_index, Some(5));
        assert_eq!(outcome.steps_run, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_view_all_toggle_round_trip() {
        let registry = registry();
        let mut runner = runner(site([boost("$149.90")]));
        let outcome = run(&mut runner, &registry, "ENCER BOOST TREATMENT VIEW ALL toggle").await;
        assert!(outcome.is_passed(), "{:?}", outcome.failure);
        let clicks = runner
            .driver()
            .call_history
            .iter()
            .filter(|c| c.as_str() == "click:#btn-view-all-content")
            .count();
        assert_eq!(clicks, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_consultation_link() {
        let registry = registry();
        let mut runner = runner(site([boost("$149.90")]));
        let outcome = run(&mut runner, &registry, "ENCER BOOST TREATMENT consultation link").await;
        assert!(outcome.is_passed(), "{:?}", outcome.failure);
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_are_idempotent() {
        let registry = registry();
        let mut runner = runner(site([boost("$149.90")]));
        let first = run(&mut runner, &registry, "ENCER BOOST TREATMENT VIEW ALL toggle").await;
        let second = run(&mut runner, &registry, "ENCER BOOST TREATMENT VIEW ALL toggle").await;
        assert_eq!(first.status, second.status);
        assert_eq!(first.steps_run, second.steps_run);
        assert_eq!(first.notes, second.notes);
    }
}

mod footer_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_every_footer_link_lands_on_its_path() {
        let registry = registry();
        let mut runner = runner(site([]));
        let report = runner.run_all(&registry, Some("footer"), false).await;
        assert_eq!(report.total(), FOOTER_LINKS.len());
        assert!(report.all_passed(), "{:?}", report.failures());
    }

    #[tokio::test(start_paused = true)]
    async fn test_broken_link_is_isolated() {
        let registry = registry();
        let mut driver = site([]);
        driver.add_page(home_with_dead_link("Blog"));
        let mut runner = runner(driver);
        let report = runner.run_all(&registry, Some("footer"), false).await;
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.failures()[0].scenario, "Footer link: Blog");
        assert_eq!(report.passed_count(), FOOTER_LINKS.len() - 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_absent_selector_times_out_naming_it() {
        let scenario = Scenario::new("Missing button", url("/")).click("#missing-button");
        let mut runner = runner(site([]));
        let start = tokio::time::Instant::now();
        let outcome = runner.run(&scenario).await;
        assert!(start.elapsed() >= std::time::Duration::from_millis(DEFAULT_COMMAND_TIMEOUT_MS));

        let failure = outcome.failure.unwrap();
        assert_eq!(failure.kind, "TimeoutExceeded");
        assert_eq!(failure.step_index, Some(0));
        assert!(failure.message.contains("#missing-button"), "{}", failure.message);
        assert!(!runner
            .driver()
            .call_history
            .iter()
            .any(|c| c.starts_with("click:")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unlisted_page_error_fails_scenario() {
        let registry = registry();
        let mut driver = site([]);
        driver.add_page(home().load_error("ReferenceError: zE is not defined"));
        let mut runner = runner(driver);
        let outcome = run(&mut runner, &registry, "Footer link: Privacy Policy").await;
        let failure = outcome.failure.unwrap();
        assert_eq!(failure.kind, "PageScriptError");
        assert_eq!(failure.step_index, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_listed_page_error_is_ignored() {
        let registry = registry();
        let mut driver = site([]);
        driver.add_page(home().load_error("TypeError: Cannot read properties of undefined (reading 'use')"));
        let mut runner = runner(driver);
        let outcome = run(&mut runner, &registry, "Footer link: Privacy Policy").await;
        assert!(outcome.is_passed(), "{:?}", outcome.failure);
    }
}

mod form_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_contact_form_logs_site_key() {
        let registry = registry();
        let mut runner = runner(site([contact(true)]));
        let outcome = run(&mut runner, &registry, "Contact form").await;
        assert!(outcome.is_passed(), "{:?}", outcome.failure);
        let notes: Vec<&str> = outcome.notes.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(
            notes,
            vec![
                format!("reCAPTCHA site key: {SITE_KEY}").as_str(),
                "Form response: Thanks for contacting us!",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_contact_form_without_captcha_still_passes() {
        let registry = registry();
        let mut runner = runner(site([contact(false)]));
        let outcome = run(&mut runner, &registry, "Contact form").await;
        assert!(outcome.is_passed(), "{:?}", outcome.failure);
        assert!(outcome.notes[0].message.starts_with("No reCAPTCHA iframe found"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_contact_form_fields_are_replaced_not_appended() {
        let registry = registry();
        let mut runner = runner(site([contact(false)]));
        run(&mut runner, &registry, "Contact form").await;
        let driver = runner.driver();
        assert_eq!(
            driver.value_of(r#"form[class*="forminator-custom-form"] input[name="email-1"]"#),
            Some(catalog::TEST_EMAIL)
        );
        let checkbox = driver
            .current_page()
            .unwrap()
            .elements
            .iter()
            .find(|e| e.selector.contains("checkbox-1"))
            .unwrap();
        assert!(checkbox.checked);
    }
}
