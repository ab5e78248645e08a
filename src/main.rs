use std::io::{BufRead, Write as _};
use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;

use togetherly::api::ApiClient;
use togetherly::auth::{self, UserSnapshot};
use togetherly::config::AppConfig;
use togetherly::content::{ConfigStore, QuestionKind};
use togetherly::entitlement::{PaymentClient, PaymentProvider, PaywallFlow, Tier};
use togetherly::error::{GenerateError, PaymentError};
use togetherly::generate::{self, GenerationPipeline, Post};
use togetherly::profile::ProfileSync;
use togetherly::wizard::{Advance, WizardState, WizardStep, view};

/// Terminal stand-in for the external card element: tokenization and
/// confirmation succeed without a real payment form.
struct DevPaymentGateway;

#[async_trait]
impl PaymentClient for DevPaymentGateway {
    async fn tokenize_card(&self) -> Result<String, PaymentError> {
        Ok("pm_dev_terminal".to_string())
    }

    async fn confirm(&self, _client_secret: &str) -> Result<(), PaymentError> {
        Ok(())
    }
}

#[async_trait]
impl PaymentProvider for DevPaymentGateway {
    async fn initialize(
        &self,
        publishable_key: &str,
    ) -> Result<Arc<dyn PaymentClient>, PaymentError> {
        tracing::info!(key = publishable_key, "payment client mounted");
        Ok(Arc::new(DevPaymentGateway))
    }
}

struct App {
    api: ApiClient,
    app_config: AppConfig,
    store: ConfigStore,
    wizard: WizardState,
    sync: ProfileSync,
    pipeline: GenerationPipeline,
    paywall: PaywallFlow,
    user: Option<UserSnapshot>,
    /// Last completed generation wins; each completion overwrites this.
    results: Vec<Post>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let app_config = AppConfig::from_env();
    let api = ApiClient::new(&app_config.base_url)?;

    eprintln!("📅 Togetherly v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Backend: {}", app_config.base_url);

    // Flags are best-effort; the wizard configuration is required.
    let store = ConfigStore::load(&api).await?;
    eprintln!(
        "   Content: {} ({} industries)\n",
        store.content_version(&app_config.fallback_content_version),
        store.config.industries.len()
    );

    let mut app = App {
        wizard: WizardState::new(&app_config.default_platform),
        sync: ProfileSync::new(),
        pipeline: GenerationPipeline::new(api.clone()),
        paywall: PaywallFlow::new(api.clone(), Arc::new(DevPaymentGateway)),
        user: None,
        results: Vec::new(),
        api,
        app_config,
        store,
    };

    // Prefill from any saved profile, then pick up the signed-in user.
    app.sync
        .load(&app.api, &app.store, &mut app.wizard.draft)
        .await;
    app.user = auth::current_user(&app.api).await.unwrap_or(None);

    app.render_step();
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "q" || input == "quit" {
            break;
        }
        app.handle(input).await;
        print!("> ");
        std::io::stdout().flush().ok();
    }
    Ok(())
}

impl App {
    async fn handle(&mut self, input: &str) {
        let mut parts = input.splitn(2, ' ');
        let cmd = parts.next().unwrap_or_default();
        let rest = parts.next().unwrap_or("").trim();

        match cmd {
            "n" | "next" => self.next().await,
            "p" | "prev" => {
                self.wizard.prev();
                self.render_step();
            }
            "t" => self.text_answer(rest),
            "kw" => {
                self.wizard.draft.commit_keywords(rest);
                println!("keywords: {}", self.wizard.draft.brand_keywords.join(", "));
            }
            "co" => {
                self.wizard.draft.set_company(rest);
                // Terminal input has no blur event; normalize on entry.
                self.wizard.draft.normalize_company();
                match togetherly::profile::validate::validate_company(&self.wizard.draft.company) {
                    Some(msg) => println!("⚠ {msg}"),
                    None => println!("company: {}", self.wizard.draft.company),
                }
            }
            "img" => {
                self.wizard.draft.include_images = !self.wizard.draft.include_images;
                println!("include images: {}", self.wizard.draft.include_images);
            }
            "gen1" => self.generate(Tier::Sample).await,
            "gen7" => self.generate(Tier::SevenDay).await,
            "gen30" => self.generate(Tier::ThirtyDay).await,
            "reels" => self.generate(Tier::ReelsOnly).await,
            "login" | "signup" => self.credentials(cmd, rest).await,
            "reset" => self.request_reset(rest).await,
            "confirm-reset" => self.confirm_reset(rest).await,
            "sub" | "subscribe" => self.subscribe().await,
            "billing" => match self.paywall.portal_session().await {
                Ok(url) => println!("manage your subscription: {url}"),
                Err(e) => println!("⚠ {e}"),
            },
            "like" | "dislike" => self.feedback(cmd == "like", rest).await,
            "whoami" => match &self.user {
                Some(u) => println!(
                    "{} (paid: {}, sample used: {})",
                    u.email, u.is_paid, u.free_sample_used
                ),
                None => println!("not signed in"),
            },
            _ => self.select(input),
        }
    }

    async fn next(&mut self) {
        match self.wizard.next() {
            Advance::Moved(_) => self.render_step(),
            Advance::Blocked => println!("⚠ fix the company name before continuing"),
            Advance::Finish => self.finish().await,
        }
    }

    async fn finish(&mut self) {
        match self
            .sync
            .save(&self.api, &self.store, &self.app_config, &mut self.wizard.draft)
            .await
        {
            Ok(outcome) => {
                println!("\n✓ Setup complete (content {})", outcome.content_version);
                for (label, value) in &outcome.summary {
                    println!("  {label:<10} {value}");
                }
                println!("Generate: gen1 | gen7 | gen30 | reels");
                self.refresh_user().await;
            }
            Err(e) => {
                if let Some(msg) = e.field_message("company") {
                    println!("⚠ company: {msg}");
                } else {
                    println!("⚠ {e}");
                }
            }
        }
    }

    /// Selection by number, addressing the current step's choices.
    fn select(&mut self, input: &str) {
        let step = self.wizard.step;
        let draft = &mut self.wizard.draft;
        match step {
            WizardStep::Industry => {
                if let Some(industry) = input
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| self.store.config.industries.get(i))
                {
                    draft.select_industry(industry);
                    self.render_step();
                }
            }
            WizardStep::IndustryDetails => {
                // `<question> <option>` pair of 1-based indexes.
                let mut nums = input.split_whitespace().filter_map(|s| s.parse::<usize>().ok());
                let (Some(qi), Some(oi)) = (nums.next(), nums.next()) else {
                    println!("chip answers: `<question#> <option#>`; text: `t <question#> <answer>`");
                    return;
                };
                let questions = view::industry_questions(draft, &self.store);
                let Some(q) = qi.checked_sub(1).and_then(|i| questions.get(i)) else {
                    return;
                };
                let Some(opt) = oi.checked_sub(1).and_then(|i| q.options.get(i)) else {
                    return;
                };
                if q.kind == QuestionKind::Chips {
                    if q.key == togetherly::content::GOALS_KEY {
                        draft.toggle_goal(&opt.key);
                    } else {
                        draft.select_choice(&q.key, &opt.key);
                    }
                    self.render_step();
                }
            }
            WizardStep::ToneAndPlatforms => {
                // Tones first, then platforms, one running index.
                let Some(n) = input.parse::<usize>().ok() else {
                    return;
                };
                let tones = self.store.config.tones.len();
                if n >= 1 && n <= tones {
                    let key = self.store.config.tones[n - 1].key.clone();
                    draft.select_tone(&key);
                } else if let Some(p) = n
                    .checked_sub(tones + 1)
                    .and_then(|i| self.store.config.platforms.get(i))
                {
                    let key = p.key.clone();
                    draft.toggle_platform(&key, &self.app_config.default_platform);
                }
                self.render_step();
            }
            WizardStep::KeywordsCompany => {
                // Numbers toggle suggested-keyword chips.
                if let Some(industry) = self.store.config.industry(&draft.industry_key)
                    && let Some(kw) = input
                        .parse::<usize>()
                        .ok()
                        .and_then(|n| n.checked_sub(1))
                        .and_then(|i| industry.suggested_keywords.get(i))
                {
                    let kw = kw.clone();
                    draft.toggle_keyword(&kw);
                    println!("keywords: {}", draft.brand_keywords.join(", "));
                }
            }
        }
    }

    fn text_answer(&mut self, rest: &str) {
        let mut parts = rest.splitn(2, ' ');
        let Some(qi) = parts.next().and_then(|s| s.parse::<usize>().ok()) else {
            return;
        };
        let answer = parts.next().unwrap_or("");
        let questions = view::industry_questions(&self.wizard.draft, &self.store);
        if let Some(q) = qi.checked_sub(1).and_then(|i| questions.get(i))
            && q.kind == QuestionKind::Text
        {
            let key = q.key.clone();
            self.wizard.draft.set_detail_text(&key, answer);
        }
    }

    async fn generate(&mut self, tier: Tier) {
        if tier == Tier::SevenDay && !togetherly::entitlement::is_offered(tier, &self.store.flags) {
            println!("the 7-day plan is not available");
            return;
        }
        let result = self
            .pipeline
            .generate_tier(
                &self.store,
                &self.app_config,
                &mut self.sync,
                &mut self.wizard.draft,
                tier,
                self.user.as_ref(),
                &self.store.flags,
            )
            .await;
        match result {
            Ok(posts) => {
                // Overwrite idempotently — the latest completion wins.
                self.results = posts;
                self.render_results();
                self.refresh_user().await;
            }
            Err(GenerateError::AuthRequired) => {
                println!("⚠ sign in first: `login <email> <password>` or `signup <email> <password>`");
            }
            Err(GenerateError::EntitlementDenied { message }) => {
                println!("⚠ {message}");
                println!("  subscribe with `sub`");
                self.refresh_user().await;
            }
            Err(e) => {
                println!("⚠ {e}");
                self.refresh_user().await;
            }
        }
    }

    async fn credentials(&mut self, cmd: &str, rest: &str) {
        let mut parts = rest.split_whitespace();
        let (Some(email), Some(password)) = (parts.next(), parts.next()) else {
            println!("usage: {cmd} <email> <password>");
            return;
        };
        let password = SecretString::from(password.to_string());
        let result = if cmd == "login" {
            auth::login(&self.api, email, &password).await
        } else {
            auth::signup(&self.api, email, &password).await
        };
        match result {
            Ok(user) => {
                println!("✓ signed in as {}", user.email);
                self.user = Some(user);
            }
            Err(e) => println!("⚠ {e}"),
        }
    }

    async fn request_reset(&mut self, email: &str) {
        if email.is_empty() {
            println!("usage: reset <email>");
            return;
        }
        match auth::request_password_reset(&self.api, email).await {
            // The dev backend hands the token back directly.
            Ok(Some(token)) => println!("reset token: {token}"),
            Ok(None) => println!("check your email for a reset link"),
            Err(e) => println!("⚠ {e}"),
        }
    }

    async fn confirm_reset(&mut self, rest: &str) {
        let mut parts = rest.split_whitespace();
        let (Some(token), Some(password)) = (parts.next(), parts.next()) else {
            println!("usage: confirm-reset <token> <new-password>");
            return;
        };
        let password = SecretString::from(password.to_string());
        match auth::confirm_password_reset(&self.api, token, &password).await {
            Ok(()) => println!("✓ password updated, log in again"),
            Err(e) => println!("⚠ {e}"),
        }
    }

    async fn subscribe(&mut self) {
        let price_id = std::env::var("TOGETHERLY_PRICE_ID")
            .unwrap_or_else(|_| "price_default_monthly".to_string());
        match self.paywall.subscribe(&price_id).await {
            Ok(outcome) => {
                println!("✓ subscribed{}", match &outcome.subscription_id {
                    Some(id) => format!(" ({id})"),
                    None => String::new(),
                });
                // Optimistic paid flag unblocks the UI pending the next
                // server refresh.
                if let Some(user) = &mut self.user {
                    user.is_paid = true;
                }
                self.refresh_user().await;
            }
            Err(e) => println!("⚠ {e}"),
        }
    }

    async fn feedback(&mut self, liked: bool, rest: &str) {
        let mut parts = rest.split_whitespace();
        let (Some(day), Some(platform)) = (
            parts.next().and_then(|s| s.parse::<u32>().ok()),
            parts.next(),
        ) else {
            println!("usage: like|dislike <day> <platform>");
            return;
        };
        self.pipeline
            .send_feedback(if liked { 1 } else { -1 }, day, platform)
            .await;
        println!("{}", if liked { "👍 Thanks" } else { "👎 Noted" });
    }

    async fn refresh_user(&mut self) {
        if let Ok(user) = auth::current_user(&self.api).await {
            self.user = user;
        }
    }

    fn render_step(&self) {
        let state = &self.wizard;
        let nav = view::nav(state);
        println!("\n── Step {}/4 ──", state.step.number());
        match state.step {
            WizardStep::Industry => {
                println!("What's your industry?");
                for (i, c) in view::industry_choices(&state.draft, &self.store).iter().enumerate() {
                    println!("  [{}] {}{}", i + 1, c.label, sel(c.selected));
                }
            }
            WizardStep::IndustryDetails => {
                let questions = view::industry_questions(&state.draft, &self.store);
                if questions.is_empty() {
                    println!("(no extra questions for this industry — `n` to continue)");
                }
                for (qi, q) in questions.iter().enumerate() {
                    println!("{}. {}", qi + 1, q.label);
                    match q.kind {
                        QuestionKind::Chips => {
                            for (oi, o) in q.options.iter().enumerate() {
                                println!("    [{} {}] {}{}", qi + 1, oi + 1, o.label, sel(o.selected));
                            }
                        }
                        QuestionKind::Text => {
                            let hint = q.placeholder.as_deref().unwrap_or("");
                            if q.value.is_empty() {
                                println!("    (t {} <answer>) {hint}", qi + 1);
                            } else {
                                println!("    = {}", q.value);
                            }
                        }
                    }
                }
            }
            WizardStep::ToneAndPlatforms => {
                println!("Pick a tone, toggle platforms:");
                let tones = view::tone_choices(&state.draft, &self.store);
                for (i, t) in tones.iter().enumerate() {
                    println!("  [{}] tone: {}{}", i + 1, t.label, sel(t.selected));
                }
                for (i, p) in view::platform_choices(&state.draft, &self.store).iter().enumerate() {
                    println!("  [{}] platform: {}{}", tones.len() + i + 1, p.label, sel(p.selected));
                }
            }
            WizardStep::KeywordsCompany => {
                println!("Keywords & company:");
                if let Some(placeholder) = view::keyword_placeholder(&state.draft, &self.store) {
                    println!("  suggestions: {placeholder}");
                }
                println!("  keywords: {}", state.draft.brand_keywords.join(", "));
                println!("  company:  {}", state.draft.company);
                println!("  (`kw a, b` to add, numbers toggle suggestions, `co <name>`, `img`)");
            }
        }
        println!(
            "[{}] {}",
            if nav.prev_enabled { "p" } else { "-" },
            nav.next_label.to_lowercase()
        );
    }

    fn render_results(&self) {
        if self.results.is_empty() {
            println!("{}", generate::display::EMPTY_NOTICE);
            return;
        }
        for group in generate::group_by_day(self.results.clone()) {
            println!("\nDay {} • {}", group.day_index, group.date);
            for post in &group.posts {
                println!("  {} • {}", capitalize(&post.platform), post.pillar);
                if let Some(prompt) = &post.image_prompt {
                    println!("  image prompt: {prompt}");
                }
                for line in post.caption.lines() {
                    println!("    {line}");
                }
                if let Some(plan) = post.reel_plan() {
                    println!("  reel script:");
                    for line in generate::display::script_copy_text(&plan).lines() {
                        println!("    {line}");
                    }
                }
            }
        }
    }
}

fn sel(selected: bool) -> &'static str {
    if selected { " ✔" } else { "" }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
