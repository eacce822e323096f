pub mod codec;
pub mod confirmations;
pub mod factory;
pub mod file_export;
pub mod hybrid;
pub mod webservice;

pub use confirmations::FileConfirmationSource;
pub use factory::OneCTransportFactory;
pub use file_export::FileTransport;
pub use hybrid::HybridTransport;
pub use webservice::WebServiceTransport;
