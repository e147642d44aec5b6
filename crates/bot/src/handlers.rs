//! Command handlers.
//!
//! Every handler returns the reply text; user-correctable wardrobe
//! errors become usage messages here and never escape. Upstream
//! failures (AI, storage) are logged and collapsed to a generic
//! apology so the dispatch loop stays error-free.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{FixedOffset, Offset, Utc};
use fitcheck_core::channel::ChannelMessage;
use fitcheck_core::error::Error;
use fitcheck_core::item::ItemStatus;
use fitcheck_core::profile::ALL_FIELDS;
use fitcheck_core::suggest::{OutfitSuggester, SuggestionRequest, WeatherReporter};
use fitcheck_wardrobe::{parse_line, Wardrobe};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::command::{self, Command, ListCommand};

const DEFAULT_OCCASION: &str = "outfit para hoy";

const ADD_USAGE: &str =
    "Formato: /add <categoría> <nombre> (detallado: categoria: nombre | detalle: valor)";

const UPSTREAM_FAILURE: &str =
    "❌ Error consultando al estilista. Intenta de nuevo en unos minutos.";

const INTERNAL_FAILURE: &str = "❌ Error interno. Intenta de nuevo.";

/// A chat that owes us its next message.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Pending {
    Bulk,
    AddPro,
}

/// Stateful handler: wardrobe, suggester, weather, per-chat capture state.
pub struct BotHandler {
    wardrobe: Arc<Wardrobe>,
    suggester: Arc<dyn OutfitSuggester>,
    weather: Option<Arc<dyn WeatherReporter>>,
    local_offset: FixedOffset,
    pending: Mutex<HashMap<String, Pending>>,
}

impl BotHandler {
    pub fn new(
        wardrobe: Arc<Wardrobe>,
        suggester: Arc<dyn OutfitSuggester>,
        weather: Option<Arc<dyn WeatherReporter>>,
        utc_offset_hours: i32,
    ) -> Self {
        let local_offset = FixedOffset::east_opt(utc_offset_hours.clamp(-12, 14) * 3600)
            .unwrap_or_else(|| Utc.fix());
        Self {
            wardrobe,
            suggester,
            weather,
            local_offset,
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn wardrobe(&self) -> &Arc<Wardrobe> {
        &self.wardrobe
    }

    pub async fn handle_message(&self, msg: &ChannelMessage) -> String {
        self.handle_text(&msg.chat_id, &msg.text).await
    }

    /// Handle one message and produce the reply text.
    pub async fn handle_text(&self, chat_id: &str, text: &str) -> String {
        let text = text.trim();

        // Capture modes swallow the next non-command message.
        if !text.starts_with('/') {
            if self.pending.lock().await.remove(chat_id).is_some() {
                return self.ingest(text).await;
            }
        } else {
            // Any command cancels a pending capture.
            self.pending.lock().await.remove(chat_id);
        }

        match command::parse(text) {
            Command::Start => self.start(),
            Command::Outfit(occasion) | Command::Freeform(occasion) => {
                self.outfit(&occasion).await
            }
            Command::Add(args) => self.add(&args).await,
            Command::AddPro => self.enter_capture(chat_id, Pending::AddPro).await,
            Command::Bulk => self.enter_capture(chat_id, Pending::Bulk).await,
            Command::Status { status, args } => self.set_status(status, &args).await,
            Command::Closet => self.wardrobe.inventory_summary().await,
            Command::Available(category) => self.available(category.as_deref()).await,
            Command::Feedback(text) => self.feedback(&text).await,
            Command::Daily(toggle) => self.daily(toggle).await,
            Command::ProfileShow => self.profile_show().await,
            Command::ProfileSet { field, value } => self.profile_set(&field, &value).await,
            Command::List(sub) => self.list(sub).await,
            Command::Unknown(token) => {
                format!("No conozco el comando {token}. Usa /start para ver los comandos.")
            }
        }
    }

    fn start(&self) -> String {
        "👔 fitcheck — tu estilista de bolsillo.\n\n\
         /outfit <ocasión> — sugerencia de outfit (o escríbeme directo)\n\
         /add <categoría> <nombre> — agregar una prenda\n\
         /addpro — agregar prendas con detalles, guiado\n\
         /bulk — pegar una lista completa de prendas\n\
         /dirty /clean /lost /damaged <prenda> — cambiar estado\n\
         /closet — todo el guardarropa\n\
         /available [categoría] — prendas limpias\n\
         /list — listas de empaque (new, add, rm, show, del)\n\
         /profile — ver y editar tu perfil\n\
         /feedback <texto> — dime qué te gustó o no\n\
         /daily on|off — outfit automático cada mañana"
            .into()
    }

    async fn enter_capture(&self, chat_id: &str, mode: Pending) -> String {
        self.pending
            .lock()
            .await
            .insert(chat_id.to_string(), mode);
        match mode {
            Pending::Bulk => "📋 Pega tu lista: una prenda por línea, formato\n\
                              categoria: nombre\n\
                              Las líneas que no entienda las salto."
                .into(),
            Pending::AddPro => "📝 Mándame tus prendas con detalles, una por línea:\n\
                                categoria: nombre | color: negro | marca: X\n\
                                Puedes mandar varias líneas en un solo mensaje."
                .into(),
        }
    }

    async fn ingest(&self, text: &str) -> String {
        match self.wardrobe.ingest(text).await {
            Ok(confirmations) if confirmations.is_empty() => {
                "No reconocí ninguna prenda. Formato: categoria: nombre".into()
            }
            Ok(confirmations) => {
                let mut reply = format!("✅ {} prendas agregadas:\n", confirmations.len());
                reply.push_str(&confirmations.join("\n"));
                reply
            }
            Err(e) => self.render_error(e),
        }
    }

    async fn outfit(&self, occasion: &str) -> String {
        let occasion = if occasion.trim().is_empty() {
            DEFAULT_OCCASION
        } else {
            occasion.trim()
        };

        match self.try_outfit(occasion).await {
            Ok(text) => text,
            Err(Error::Suggest(e)) => {
                warn!(error = %e, "Suggester failed");
                UPSTREAM_FAILURE.into()
            }
            Err(e) => {
                warn!(error = %e, "Outfit request failed");
                INTERNAL_FAILURE.into()
            }
        }
    }

    /// Outfit for the daily job. `None` on failure, so the scheduler can
    /// stay silent instead of pushing an apology to the owner chat.
    pub async fn daily_outfit(&self) -> Option<String> {
        match self.try_outfit(DEFAULT_OCCASION).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(error = %e, "Daily outfit skipped");
                None
            }
        }
    }

    async fn try_outfit(&self, occasion: &str) -> Result<String, Error> {
        let snapshot = self.wardrobe.context_snapshot().await;
        let context_json = snapshot.to_json()?;

        let weather = match (&self.weather, snapshot.profile.city.as_deref()) {
            (Some(reporter), Some(city)) => Some(reporter.report(city).await),
            _ => None,
        };

        let now_local = Utc::now().with_timezone(&self.local_offset);
        let request = SuggestionRequest {
            context_json,
            request: occasion.to_string(),
            weather,
            local_time: now_local.format("%Y-%m-%d %H:%M (%A)").to_string(),
        };

        let text = self.suggester.suggest(request).await?;
        if let Err(e) = self.wardrobe.record_outfit(occasion, &text).await {
            warn!(error = %e, "Failed to record outfit in history");
        }
        info!(occasion, "Outfit delivered");
        Ok(text)
    }

    async fn add(&self, args: &str) -> String {
        let args = args.trim();
        if args.is_empty() {
            return ADD_USAGE.into();
        }

        let (category, name, details) = if let Some(parsed) =
            parse_line(args, self.wardrobe.categories())
        {
            (parsed.category, parsed.name, parsed.details)
        } else if let Some((category, _)) = args.split_once(':') {
            // Colon form the ingest grammar rejected: bad category or empty name.
            let category = category.trim().to_lowercase();
            if !category.is_empty()
                && !self.wardrobe.categories().iter().any(|c| *c == category)
            {
                return self.unknown_category(&category);
            }
            return ADD_USAGE.into();
        } else if let Some((category, name)) = args.split_once(char::is_whitespace) {
            // Short form: first word is the category, the rest is the name.
            let category = category.to_lowercase();
            let name = name.trim();
            if !self.wardrobe.categories().iter().any(|c| *c == category) {
                return self.unknown_category(&category);
            }
            if name.is_empty() {
                return ADD_USAGE.into();
            }
            (category, name.to_string(), BTreeMap::new())
        } else {
            return ADD_USAGE.into();
        };

        match self.wardrobe.add_item(&category, &name, details).await {
            Ok(id) => format!("✅ {name} agregada a {category} (#{})", id.short()),
            Err(e) => self.render_error(e),
        }
    }

    fn unknown_category(&self, category: &str) -> String {
        format!(
            "❌ Categoría no registrada: {category}\nCategorías: {}",
            self.wardrobe.categories().join(", ")
        )
    }

    async fn set_status(&self, status: ItemStatus, args: &str) -> String {
        if args.trim().is_empty() {
            return format!(
                "Formato: /{} <prenda> [| motivo]",
                status_command(status)
            );
        }

        let (query, reason) = match args.split_once('|') {
            Some((q, r)) => (q.trim(), Some(r.trim().to_string())),
            None => (args.trim(), None),
        };

        let item = match self.wardrobe.find_item(query).await {
            Ok(item) => item,
            Err(e) => return self.render_error(e),
        };

        match self.wardrobe.set_status(&item.id, status, reason.clone()).await {
            Ok(true) => {
                let mut reply = format!(
                    "{} {} marcada como {}",
                    status.marker(),
                    item.name,
                    status_label(status)
                );
                if let Some(reason) = reason.filter(|r| !r.is_empty()) {
                    reply.push_str(&format!(" ({reason})"));
                }
                reply
            }
            Ok(false) => format!("❌ No encontré la prenda '{query}'"),
            Err(e) => self.render_error(e),
        }
    }

    async fn available(&self, category: Option<&str>) -> String {
        if let Some(category) = category {
            if !self.wardrobe.categories().iter().any(|c| c == category) {
                return self.unknown_category(category);
            }
        }

        let items = self.wardrobe.list_available(category).await;
        if items.is_empty() {
            return "No hay prendas disponibles. ¿Todo en la lavandería? 🧺".into();
        }

        let mut lines = vec![format!("✅ Disponibles ({}):", items.len())];
        for item in items {
            lines.push(format!("  {} (#{}) — {}", item.name, item.id.short(), item.category));
        }
        lines.join("\n")
    }

    async fn feedback(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return "Formato: /feedback <qué te gustó o no>".into();
        }
        match self.wardrobe.add_feedback(text.trim()).await {
            Ok(()) => "📝 Feedback guardado. Lo tomaré en cuenta.".into(),
            Err(e) => self.render_error(e),
        }
    }

    async fn daily(&self, toggle: Option<bool>) -> String {
        match toggle {
            Some(enabled) => match self.wardrobe.set_daily_enabled(enabled).await {
                Ok(()) if enabled => "☀️ Outfit diario activado.".into(),
                Ok(()) => "Outfit diario desactivado.".into(),
                Err(e) => self.render_error(e),
            },
            None => {
                let enabled = self.wardrobe.profile().await.daily_enabled;
                format!(
                    "Outfit diario: {}. Usa /daily on o /daily off.",
                    if enabled { "activado" } else { "desactivado" }
                )
            }
        }
    }

    async fn profile_show(&self) -> String {
        let profile = self.wardrobe.profile().await;
        let mut lines = vec!["👤 Tu perfil:".to_string()];
        for field in ALL_FIELDS {
            lines.push(format!("  {}: {}", field.key(), profile.render(field)));
        }
        lines.push(format!(
            "  outfit diario: {}",
            if profile.daily_enabled { "activado" } else { "desactivado" }
        ));
        lines.push(String::new());
        lines.push("Edita con /profile <campo> <valor> (peso, meta, edad, pelo, tono, subtono, estatura, ciudad)".into());
        lines.join("\n")
    }

    async fn profile_set(&self, field: &str, value: &str) -> String {
        if value.trim().is_empty() {
            return "Formato: /profile <campo> <valor>".into();
        }
        match self.wardrobe.set_profile_field(field, value).await {
            Ok(stored) => format!("✅ {field} = {stored}"),
            Err(e) => self.render_error(e),
        }
    }

    async fn list(&self, sub: ListCommand) -> String {
        match sub {
            ListCommand::New { name, description } => {
                match self.wardrobe.create_list(&name, description).await {
                    Ok(true) => format!("📋 Lista '{name}' creada."),
                    Ok(false) => format!("❌ Ya existe una lista llamada '{name}'."),
                    Err(e) => self.render_error(e),
                }
            }
            ListCommand::Delete(name) => match self.wardrobe.delete_list(&name).await {
                Ok(true) => format!("🗑 Lista '{name}' eliminada."),
                Ok(false) => format!("❌ No hay lista llamada '{name}'."),
                Err(e) => self.render_error(e),
            },
            ListCommand::AddItem { name, text } => {
                match self.wardrobe.add_list_item(&name, &text).await {
                    Ok(()) => format!("✅ Agregado a '{name}': {text}"),
                    Err(e) => self.render_error(e),
                }
            }
            ListCommand::Remove { name, index_raw } => {
                let Ok(index) = index_raw.parse::<usize>() else {
                    return format!("'{index_raw}' no es un número. Formato: /list rm <lista> <número>");
                };
                match self.wardrobe.remove_list_item(&name, index).await {
                    Ok(removed) => format!("🗑 Quitado de '{name}': {removed}"),
                    Err(e) => self.render_error(e),
                }
            }
            ListCommand::Show(name) => match self.wardrobe.get_list(&name).await {
                Some(list) => {
                    let mut lines = vec![format!("📋 {}", list.name)];
                    if let Some(desc) = &list.description {
                        lines.push(format!("   {desc}"));
                    }
                    if list.items.is_empty() {
                        lines.push("   (vacía)".into());
                    }
                    for (i, item) in list.items.iter().enumerate() {
                        lines.push(format!("   {}. {item}", i + 1));
                    }
                    lines.join("\n")
                }
                None => format!("❌ No hay lista llamada '{name}'."),
            },
            ListCommand::All => {
                let lists = self.wardrobe.lists().await;
                if lists.is_empty() {
                    return "No tienes listas. Crea una con /list new <nombre>".into();
                }
                let mut lines = vec!["📋 Tus listas:".to_string()];
                for list in lists {
                    lines.push(format!("  {} ({} cosas)", list.name, list.items.len()));
                }
                lines.join("\n")
            }
            ListCommand::Usage => "Listas: /list new <nombre> [| descripción], /list add <lista> | <cosa>, \
                 /list rm <lista> <número>, /list show <lista>, /list del <nombre>, /list"
                .into(),
        }
    }

    /// Render an error for the user. Wardrobe errors are self-explanatory;
    /// anything else is logged and collapsed.
    fn render_error(&self, error: Error) -> String {
        match error {
            Error::Wardrobe(e) => format!("❌ {e}"),
            other => {
                warn!(error = %other, "Handler hit a non-domain error");
                INTERNAL_FAILURE.into()
            }
        }
    }
}

fn status_command(status: ItemStatus) -> &'static str {
    match status {
        ItemStatus::Clean => "clean",
        ItemStatus::Dirty => "dirty",
        ItemStatus::Lost => "lost",
        ItemStatus::Damaged => "damaged",
    }
}

fn status_label(status: ItemStatus) -> &'static str {
    match status {
        ItemStatus::Clean => "limpia",
        ItemStatus::Dirty => "sucia",
        ItemStatus::Lost => "perdida",
        ItemStatus::Damaged => "dañada",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fitcheck_core::error::SuggestError;
    use fitcheck_core::repository::WardrobeRepository;
    use fitcheck_store::InMemoryRepository;

    struct StubSuggester;

    #[async_trait]
    impl OutfitSuggester for StubSuggester {
        fn name(&self) -> &str {
            "stub"
        }
        async fn suggest(&self, _request: SuggestionRequest) -> Result<String, SuggestError> {
            Ok("Jeans y playera negra.".into())
        }
    }

    struct FailingSuggester;

    #[async_trait]
    impl OutfitSuggester for FailingSuggester {
        fn name(&self) -> &str {
            "failing"
        }
        async fn suggest(&self, _request: SuggestionRequest) -> Result<String, SuggestError> {
            Err(SuggestError::RateLimited { retry_after_secs: 5 })
        }
    }

    async fn handler_with(suggester: Arc<dyn OutfitSuggester>) -> (BotHandler, Arc<InMemoryRepository>) {
        let repo = Arc::new(InMemoryRepository::new());
        let categories = ["calzado", "tops", "capas"]
            .into_iter()
            .map(String::from)
            .collect();
        let wardrobe = Arc::new(
            Wardrobe::open(categories, repo.clone()).await.unwrap(),
        );
        (BotHandler::new(wardrobe, suggester, None, -6), repo)
    }

    async fn handler() -> (BotHandler, Arc<InMemoryRepository>) {
        handler_with(Arc::new(StubSuggester)).await
    }

    #[tokio::test]
    async fn add_and_closet_roundtrip() {
        let (handler, _) = handler().await;
        let reply = handler
            .handle_text("1", "/add calzado: Dr Martens 1460 | color: negro")
            .await;
        assert!(reply.contains("✅"));
        assert!(reply.contains("Dr Martens 1460"));

        let closet = handler.handle_text("1", "/closet").await;
        assert!(closet.contains("CALZADO"));
        assert!(closet.contains("Dr Martens 1460"));
    }

    #[tokio::test]
    async fn add_space_separated_form() {
        let (handler, _) = handler().await;
        let reply = handler
            .handle_text("1", "/add calzado Dr Martens 1460 negras")
            .await;
        assert!(reply.contains("✅"));
        assert!(reply.contains("Dr Martens 1460 negras"));
        assert!(reply.contains("calzado"));

        let closet = handler.handle_text("1", "/closet").await;
        assert!(closet.contains("Dr Martens 1460 negras"));
    }

    #[tokio::test]
    async fn add_unregistered_category_lists_valid_ones() {
        let (handler, repo) = handler().await;
        let reply = handler.handle_text("1", "/add sombreros: fedora").await;
        assert!(reply.contains("sombreros"));
        assert!(reply.contains("calzado"));

        let reply = handler.handle_text("1", "/add sombreros fedora").await;
        assert!(reply.contains("sombreros"));
        assert!(reply.contains("calzado"));
        assert_eq!(repo.save_count(), 0);
    }

    #[tokio::test]
    async fn bulk_captures_next_message() {
        let (handler, _) = handler().await;
        let prompt = handler.handle_text("1", "/bulk").await;
        assert!(prompt.contains("una prenda por línea"));

        let reply = handler
            .handle_text("1", "calzado: botas\ntops: playera negra\nbasura sin formato")
            .await;
        assert!(reply.contains("2 prendas agregadas"));
    }

    #[tokio::test]
    async fn command_cancels_pending_capture() {
        let (handler, _) = handler().await;
        handler.handle_text("1", "/bulk").await;
        handler.handle_text("1", "/closet").await;

        // Capture cleared: freeform now goes to the suggester.
        let reply = handler.handle_text("1", "algo casual").await;
        assert_eq!(reply, "Jeans y playera negra.");
    }

    #[tokio::test]
    async fn capture_state_is_per_chat() {
        let (handler, _) = handler().await;
        handler.handle_text("1", "/bulk").await;

        // A different chat is not in capture mode.
        let reply = handler.handle_text("2", "calzado: botas").await;
        assert_eq!(reply, "Jeans y playera negra.");
    }

    #[tokio::test]
    async fn dirty_then_clean_flow() {
        let (handler, _) = handler().await;
        handler.handle_text("1", "/add tops: playera negra").await;

        let reply = handler.handle_text("1", "/dirty playera").await;
        assert!(reply.contains("playera negra"));
        assert!(reply.contains("sucia"));

        let available = handler.handle_text("1", "/available").await;
        assert!(available.contains("No hay prendas disponibles"));

        let reply = handler.handle_text("1", "/clean playera").await;
        assert!(reply.contains("limpia"));
    }

    #[tokio::test]
    async fn lost_with_reason_is_echoed() {
        let (handler, _) = handler().await;
        handler.handle_text("1", "/add capas: chamarra de mezclilla").await;
        let reply = handler
            .handle_text("1", "/lost chamarra | se quedó en el bar")
            .await;
        assert!(reply.contains("perdida"));
        assert!(reply.contains("se quedó en el bar"));
    }

    #[tokio::test]
    async fn ambiguous_status_query_reports_candidates() {
        let (handler, _) = handler().await;
        handler.handle_text("1", "/add tops: playera negra").await;
        handler.handle_text("1", "/add capas: chamarra negra").await;

        let reply = handler.handle_text("1", "/dirty negra").await;
        assert!(reply.contains("❌"));
        assert!(reply.contains("playera negra"));
        assert!(reply.contains("chamarra negra"));
    }

    #[tokio::test]
    async fn freeform_gets_suggestion_and_records_history() {
        let (handler, repo) = handler().await;
        let reply = handler.handle_text("1", "voy a un bar con amigos").await;
        assert_eq!(reply, "Jeans y playera negra.");

        let state = repo.load().await.unwrap();
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].occasion, "voy a un bar con amigos");
    }

    #[tokio::test]
    async fn empty_outfit_uses_default_occasion() {
        let (handler, repo) = handler().await;
        handler.handle_text("1", "/outfit").await;
        let state = repo.load().await.unwrap();
        assert_eq!(state.history[0].occasion, DEFAULT_OCCASION);
    }

    #[tokio::test]
    async fn suggester_failure_is_a_generic_apology() {
        let (handler, repo) = handler_with(Arc::new(FailingSuggester)).await;
        let reply = handler.handle_text("1", "/outfit fiesta").await;
        assert_eq!(reply, UPSTREAM_FAILURE);

        // Failed suggestions never enter history.
        let state = repo.load().await.unwrap();
        assert!(state.history.is_empty());
    }

    #[tokio::test]
    async fn daily_outfit_returns_the_suggestion() {
        let (handler, repo) = handler().await;
        let text = handler.daily_outfit().await.unwrap();
        assert_eq!(text, "Jeans y playera negra.");
        let state = repo.load().await.unwrap();
        assert_eq!(state.history[0].occasion, DEFAULT_OCCASION);
    }

    #[tokio::test]
    async fn daily_outfit_is_silent_on_suggester_failure() {
        let (handler, repo) = handler_with(Arc::new(FailingSuggester)).await;
        assert!(handler.daily_outfit().await.is_none());
        assert!(repo.load().await.unwrap().history.is_empty());
    }

    #[tokio::test]
    async fn profile_set_and_show() {
        let (handler, _) = handler().await;
        let reply = handler.handle_text("1", "/profile peso 70").await;
        assert!(reply.contains("peso = 70"));

        let shown = handler.handle_text("1", "/profile").await;
        assert!(shown.contains("weight_kg: 70"));
        assert!(shown.contains("age: ?"));
    }

    #[tokio::test]
    async fn profile_unknown_field_is_an_error() {
        let (handler, _) = handler().await;
        let reply = handler.handle_text("1", "/profile zapato 42").await;
        assert!(reply.contains("❌"));
    }

    #[tokio::test]
    async fn packing_list_full_flow() {
        let (handler, _) = handler().await;
        assert!(handler
            .handle_text("1", "/list new viaje | fin de semana")
            .await
            .contains("creada"));
        assert!(handler
            .handle_text("1", "/list add viaje | bloqueador")
            .await
            .contains("Agregado"));
        assert!(handler
            .handle_text("1", "/list add viaje | cargador")
            .await
            .contains("Agregado"));

        let shown = handler.handle_text("1", "/list show viaje").await;
        assert!(shown.contains("1. bloqueador"));
        assert!(shown.contains("2. cargador"));

        assert!(handler
            .handle_text("1", "/list rm viaje 1")
            .await
            .contains("bloqueador"));
        assert!(handler
            .handle_text("1", "/list del viaje")
            .await
            .contains("eliminada"));
        assert!(handler
            .handle_text("1", "/list")
            .await
            .contains("No tienes listas"));
    }

    #[tokio::test]
    async fn list_rm_bad_index_is_bounds_checked() {
        let (handler, _) = handler().await;
        handler.handle_text("1", "/list new gym").await;
        handler.handle_text("1", "/list add gym | toalla").await;

        let reply = handler.handle_text("1", "/list rm gym 5").await;
        assert!(reply.contains("❌"));

        let reply = handler.handle_text("1", "/list rm gym cinco").await;
        assert!(reply.contains("no es un número"));
    }

    #[tokio::test]
    async fn daily_toggle_persists() {
        let (handler, repo) = handler().await;
        assert!(handler.handle_text("1", "/daily on").await.contains("activado"));
        assert!(repo.load().await.unwrap().profile.daily_enabled);

        assert!(handler
            .handle_text("1", "/daily")
            .await
            .contains("activado"));
        assert!(handler
            .handle_text("1", "/daily off")
            .await
            .contains("desactivado"));
    }

    #[tokio::test]
    async fn feedback_is_stored() {
        let (handler, repo) = handler().await;
        handler
            .handle_text("1", "/feedback los jeans negros me quedan flojos")
            .await;
        let state = repo.load().await.unwrap();
        assert_eq!(state.feedback.len(), 1);
        assert!(state.feedback[0].text.contains("flojos"));
    }

    #[tokio::test]
    async fn unknown_command_points_to_start() {
        let (handler, _) = handler().await;
        let reply = handler.handle_text("1", "/fly").await;
        assert!(reply.contains("/start"));
    }
}
