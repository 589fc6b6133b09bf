use super::GalleryError;
use axum::body::Bytes;
use std::collections::HashMap;

/// Handle to a blob registered with the surface, valid until revoked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Provider-hosted thumbnail.
    Remote(String),
    /// Locally held full image.
    Object(ObjectUrl),
}

/// One rendered grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTile {
    pub id: String,
    pub alt: String,
    pub src: ImageSource,
}

/// Where the gallery renders.
pub trait DisplaySurface: Send {
    /// Empty the image grid. Fails when the grid anchor is missing.
    fn clear(&mut self) -> Result<(), GalleryError>;

    fn append_image(&mut self, tile: ImageTile) -> Result<(), GalleryError>;

    fn create_object_url(&mut self, blob: Bytes) -> ObjectUrl;

    fn revoke_object_url(&mut self, url: &ObjectUrl);

    /// Open an empty viewer window.
    fn open_window(&mut self) -> Result<WindowHandle, GalleryError>;

    fn write_window(&mut self, window: WindowHandle, html: &str) -> Result<(), GalleryError>;

    /// Close a viewer window. Unknown handles are ignored.
    fn close_window(&mut self, window: WindowHandle);
}

/// A surface that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemorySurface {
    pub tiles: Vec<ImageTile>,
    pub windows: HashMap<WindowHandle, Option<String>>,
    pub live_urls: HashMap<ObjectUrl, Bytes>,
    /// Simulates a page without the grid anchor.
    pub detached: bool,
    /// Simulates a popup blocker.
    pub block_popups: bool,
    next_id: u64,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl DisplaySurface for MemorySurface {
    fn clear(&mut self) -> Result<(), GalleryError> {
        if self.detached {
            return Err(GalleryError::MissingAnchor("marketplace".to_string()));
        }
        self.tiles.clear();
        Ok(())
    }

    fn append_image(&mut self, tile: ImageTile) -> Result<(), GalleryError> {
        if self.detached {
            return Err(GalleryError::MissingAnchor("marketplace".to_string()));
        }
        self.tiles.push(tile);
        Ok(())
    }

    fn create_object_url(&mut self, blob: Bytes) -> ObjectUrl {
        let url = ObjectUrl::new(format!("blob:memory/{}", self.next()));
        self.live_urls.insert(url.clone(), blob);
        url
    }

    fn revoke_object_url(&mut self, url: &ObjectUrl) {
        self.live_urls.remove(url);
    }

    fn open_window(&mut self) -> Result<WindowHandle, GalleryError> {
        if self.block_popups {
            return Err(GalleryError::WindowBlocked);
        }
        let window = WindowHandle(self.next());
        self.windows.insert(window, None);
        Ok(window)
    }

    fn write_window(&mut self, window: WindowHandle, html: &str) -> Result<(), GalleryError> {
        let slot = self
            .windows
            .get_mut(&window)
            .ok_or(GalleryError::UnknownWindow)?;
        *slot = Some(html.to_string());
        Ok(())
    }

    fn close_window(&mut self, window: WindowHandle) {
        self.windows.remove(&window);
    }
}
