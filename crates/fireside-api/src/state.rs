//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use fireside_bridge::connection::ConnectionRoster;
use fireside_bridge::dispatcher::FrameDispatcher;
use fireside_bridge::forwarder::BotBridge;
use fireside_bridge::locator::{ChannelDirectory, ConnectionLocator};
use fireside_bridge::registry::PendingRegistry;
use fireside_cards::application::binding_service::BindingService;
use fireside_cards::application::template_service::TemplateService;
use fireside_cards::repository::{BindingRepository, MembershipGuard, TemplateRepository};
use fireside_core::clock::Clock;
use fireside_roster::directory::MemberDirectory;
use fireside_roster::profile::UserRepository;

use crate::handler::InboundRequestLog;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Template CRUD service.
    pub templates: Arc<TemplateService>,
    /// Binding service.
    pub bindings: Arc<BindingService>,
    /// Bridge to the connected dice-engine bots.
    pub bridge: Arc<BotBridge>,
    /// Dispatcher fed by every bot connection's read loop.
    pub dispatcher: Arc<FrameDispatcher>,
    /// Live bot sessions.
    pub roster: Arc<ConnectionRoster>,
    /// Channel/member directory.
    pub directory: Arc<MemberDirectory>,
    /// User-profile store.
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    /// Wires the bridge core and the services over the given stores.
    #[must_use]
    pub fn new(
        templates: Arc<dyn TemplateRepository>,
        bindings: Arc<dyn BindingRepository>,
        users: Arc<dyn UserRepository>,
        directory: Arc<MemberDirectory>,
        clock: Arc<dyn Clock>,
        bot_call_timeout: Duration,
    ) -> Self {
        let registry = Arc::new(PendingRegistry::new(Arc::clone(&clock)));
        let roster = Arc::new(ConnectionRoster::new());
        let locator = ConnectionLocator::new(
            Arc::clone(&roster),
            Arc::clone(&directory) as Arc<dyn ChannelDirectory>,
        );
        let bridge = Arc::new(BotBridge::new(
            Arc::clone(&registry),
            locator,
            bot_call_timeout,
        ));
        let dispatcher = Arc::new(FrameDispatcher::new(
            Arc::clone(&registry),
            Arc::new(InboundRequestLog),
        ));

        let template_service = Arc::new(TemplateService::new(
            Arc::clone(&templates),
            Arc::clone(&bindings),
            Arc::clone(&clock),
        ));
        let binding_service = Arc::new(BindingService::new(
            bindings,
            templates,
            Arc::clone(&directory) as Arc<dyn MembershipGuard>,
            clock,
        ));

        Self {
            templates: template_service,
            bindings: binding_service,
            bridge,
            dispatcher,
            roster,
            directory,
            users,
        }
    }
}
