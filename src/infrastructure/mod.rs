pub mod cancel;
pub mod clock;
pub mod envelope;
pub mod http;
pub mod loading;
pub mod router;
pub mod storage;
pub mod toast;

pub use cancel::{NavigationEpoch, NavigationTicket};
pub use clock::{Clock, ManualClock, SystemClock};
pub use envelope::Envelope;
pub use http::{HttpClient, RequestOptions, UploadFile};
pub use loading::{LoadingGuard, LoadingIndicator};
pub use router::{Router, View};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageScope};
pub use toast::{Toast, ToastLevel, Toasts};
