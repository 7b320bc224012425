use portfolio_auth_impl::AuthAccessTokenServiceImpl;
use portfolio_core_contact_impl::ContactFeatureServiceImpl;
use portfolio_email_impl::EmailServiceImpl;
use portfolio_extern_impl::oauth2::OAuth2ApiServiceImpl;
use portfolio_shared_impl::time::TimeServiceImpl;

// API
pub type RestServer = portfolio_api_rest::RestServer<ContactFeature>;

// Core
pub type ContactFeature = ContactFeatureServiceImpl<AuthAccessToken, Email>;

// Auth
pub type AuthAccessToken = AuthAccessTokenServiceImpl<Time, OAuth2Api>;

// Extern
pub type OAuth2Api = OAuth2ApiServiceImpl;

// Shared
pub type Time = TimeServiceImpl;

// Email
pub type Email = EmailServiceImpl;
