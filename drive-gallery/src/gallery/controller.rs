use super::magnify;
use super::surface::{DisplaySurface, ImageSource, ImageTile, ObjectUrl, WindowHandle};
use super::{GalleryApi, GalleryError};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Provider thumbnails, loaded straight from their links.
    #[default]
    Thumbnails,
    /// Full images fetched through the gateway.
    Blob,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryState {
    pub current_folder_id: Option<String>,
    pub view_mode: ViewMode,
}

pub struct GalleryController<A, S> {
    api: A,
    surface: S,
    state: GalleryState,
    /// Object URLs backing the current grid.
    grid_urls: Vec<ObjectUrl>,
    /// Object URLs waiting for their viewer window to finish loading.
    pending_windows: HashMap<WindowHandle, ObjectUrl>,
}

impl<A: GalleryApi, S: DisplaySurface> GalleryController<A, S> {
    pub fn new(api: A, surface: S) -> Self {
        Self {
            api,
            surface,
            state: GalleryState::default(),
            grid_urls: Vec::new(),
            pending_windows: HashMap::new(),
        }
    }

    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Show `folder_id` in the current view mode.
    pub async fn select_folder(&mut self, folder_id: &str) -> Result<(), GalleryError> {
        self.state.current_folder_id = Some(folder_id.to_string());
        self.render_folder(folder_id).await
    }

    /// Change the view mode and re-render the selected folder.
    ///
    /// The mode is kept even when no folder is selected yet, but the call
    /// still fails so the caller can report it.
    pub async fn switch_view(&mut self, mode: ViewMode) -> Result<(), GalleryError> {
        self.state.view_mode = mode;
        let folder_id = self
            .state
            .current_folder_id
            .clone()
            .ok_or(GalleryError::NoFolderSelected)?;
        self.render_folder(&folder_id).await
    }

    async fn render_folder(&mut self, folder_id: &str) -> Result<(), GalleryError> {
        self.clear_grid()?;

        let thumbnails = self.api.list_thumbnails(folder_id).await?;
        tracing::debug!(
            folder_id = %folder_id,
            count = thumbnails.len(),
            mode = ?self.state.view_mode,
            "Rendering folder"
        );

        match self.state.view_mode {
            ViewMode::Thumbnails => {
                for thumb in thumbnails {
                    self.surface.append_image(ImageTile {
                        id: thumb.id,
                        alt: thumb.name,
                        src: ImageSource::Remote(thumb.thumbnail_url),
                    })?;
                }
            }
            ViewMode::Blob => {
                // Every blob must arrive before anything is drawn.
                let api = &self.api;
                let blobs =
                    try_join_all(thumbnails.iter().map(|thumb| api.fetch_blob(&thumb.id))).await?;

                for (thumb, blob) in thumbnails.into_iter().zip(blobs) {
                    let url = self.surface.create_object_url(blob);
                    self.grid_urls.push(url.clone());
                    self.surface.append_image(ImageTile {
                        id: thumb.id,
                        alt: thumb.name,
                        src: ImageSource::Object(url),
                    })?;
                }
            }
        }
        Ok(())
    }

    fn clear_grid(&mut self) -> Result<(), GalleryError> {
        self.surface.clear()?;
        for url in self.grid_urls.drain(..) {
            self.surface.revoke_object_url(&url);
        }
        Ok(())
    }

    /// Open the magnified view of one image with its transcription.
    ///
    /// The window is opened before any request is made so popup blockers
    /// treat it as part of the user gesture.
    pub async fn magnify(&mut self, file_id: &str) -> Result<WindowHandle, GalleryError> {
        let window = self.surface.open_window()?;

        match self.fill_window(window, file_id).await {
            Ok(url) => {
                self.pending_windows.insert(window, url);
                Ok(window)
            }
            Err(e) => {
                tracing::warn!(file_id = %file_id, error = %e, "Closing viewer window");
                self.surface.close_window(window);
                Err(e)
            }
        }
    }

    async fn fill_window(
        &mut self,
        window: WindowHandle,
        file_id: &str,
    ) -> Result<ObjectUrl, GalleryError> {
        let (blob, transcription) =
            tokio::try_join!(self.api.fetch_blob(file_id), self.api.transcribe(file_id))?;
        let template = self.api.fetch_template().await?;

        let url = self.surface.create_object_url(blob);
        let html = magnify::render(&template, url.as_str(), &transcription);
        if let Err(e) = self.surface.write_window(window, &html) {
            self.surface.revoke_object_url(&url);
            return Err(e);
        }
        Ok(url)
    }

    /// Release the object URL behind a viewer window once it has loaded.
    pub fn window_loaded(&mut self, window: WindowHandle) -> Result<(), GalleryError> {
        let url = self
            .pending_windows
            .remove(&window)
            .ok_or(GalleryError::UnknownWindow)?;
        self.surface.revoke_object_url(&url);
        Ok(())
    }
}
