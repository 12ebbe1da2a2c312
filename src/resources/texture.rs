use futures::channel::oneshot;
use image::{RgbaImage, imageops::FilterType};

pub fn texture_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("texture_bind_group_layout"),
    })
}

/**
 * A `size`×`size` RGB checkerboard with `squares` squares per side.
 *
 * Pixel (x, y) is white when `floor(y / step) + floor(x / step)` is even and
 * black otherwise, with `step = size / squares`.
 */
pub fn checker_pixels(size: u32, squares: u32) -> Vec<u8> {
    let step = size as f32 / squares as f32;
    let mut pixels = Vec::with_capacity((size * size * 3) as usize);
    for y in 0..size {
        for x in 0..size {
            let cell = (y as f32 / step).floor() as u64 + (x as f32 / step).floor() as u64;
            let v = if cell % 2 == 0 { 255 } else { 0 };
            pixels.extend_from_slice(&[v, v, v]);
        }
    }
    pixels
}

/// Expands tightly packed RGB to RGBA; wgpu has no 3-channel 8-bit format.
pub fn rgb_to_rgba(size: u32, rgb: &[u8]) -> RgbaImage {
    let rgba = rgb
        .chunks_exact(3)
        .flat_map(|px| [px[0], px[1], px[2], 255])
        .collect();
    RgbaImage::from_raw(size, size, rgba).unwrap_or_else(|| RgbaImage::new(size, size))
}

/// Number of mip levels down to 1×1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// The full mip chain of `base`, level 0 first. Every level halves the previous
/// one with a linear filter.
pub fn mip_chain(base: &RgbaImage) -> Vec<RgbaImage> {
    let levels = mip_level_count(base.width(), base.height());
    let mut chain = Vec::with_capacity(levels as usize);
    chain.push(base.clone());
    for level in 1..levels {
        let width = (base.width() >> level).max(1);
        let height = (base.height() >> level).max(1);
        let prev = &chain[level as usize - 1];
        let next = image::imageops::resize(prev, width, height, FilterType::Triangle);
        chain.push(next);
    }
    chain
}

/// Where the asynchronous image texture stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureState {
    Loading,
    Ready,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveTexture {
    Checker,
    Image,
}

/// The image texture is only used when requested AND loaded; every other case
/// falls back to the checkerboard.
pub fn select_texture(use_image: bool, image: TextureState) -> ActiveTexture {
    match (use_image, image) {
        (true, TextureState::Ready) => ActiveTexture::Image,
        _ => ActiveTexture::Checker,
    }
}

/**
 * A pending image load that the render loop polls once per frame.
 *
 * The decoded image is handed over exactly once: the poll that observes it moves
 * the state to `Ready` and returns the image, every later poll returns `None`.
 */
#[derive(Debug)]
pub struct ImageLoad {
    receiver: Option<oneshot::Receiver<anyhow::Result<RgbaImage>>>,
    state: TextureState,
}

impl ImageLoad {
    pub fn from_receiver(receiver: oneshot::Receiver<anyhow::Result<RgbaImage>>) -> Self {
        Self {
            receiver: Some(receiver),
            state: TextureState::Loading,
        }
    }

    /// Starts fetching and decoding `file_name` in the background.
    ///
    /// On native this needs to run inside a tokio runtime.
    pub fn spawn(file_name: String) -> Self {
        let (tx, rx) = oneshot::channel();
        let task = async move {
            let result = load_image(&file_name).await;
            if let Err(e) = &result {
                log::warn!("Image texture {file_name} could not be loaded: {e:#}");
            }
            // The receiver is gone if the app shut down first.
            let _ = tx.send(result);
        };
        #[cfg(not(target_arch = "wasm32"))]
        tokio::spawn(task);
        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(task);
        Self::from_receiver(rx)
    }

    pub fn state(&self) -> TextureState {
        self.state
    }

    pub fn poll(&mut self) -> Option<RgbaImage> {
        let receiver = self.receiver.as_mut()?;
        let outcome = match receiver.try_recv() {
            Ok(None) => return None,
            Ok(Some(outcome)) => outcome,
            Err(oneshot::Canceled) => Err(anyhow::anyhow!("image load was cancelled")),
        };
        self.receiver = None;
        match outcome {
            Ok(img) => {
                self.state = TextureState::Ready;
                Some(img)
            }
            Err(_) => {
                self.state = TextureState::Failed;
                None
            }
        }
    }
}

/// Decodes an image and flips it vertically so that texture coordinate
/// `(0, 0)` samples its bottom-left corner.
pub fn decode_flipped(bytes: &[u8]) -> anyhow::Result<RgbaImage> {
    let img = image::load_from_memory(bytes)?;
    Ok(img.flipv().to_rgba8())
}

pub async fn load_image(file_name: &str) -> anyhow::Result<RgbaImage> {
    let data = load_binary(file_name).await?;
    decode_flipped(&data)
}

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().ok_or_else(|| anyhow::anyhow!("no browser window"))?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| anyhow::anyhow!("page origin is not readable"))?;
    let base = reqwest::Url::parse(&format!("{}/assets/", origin))?;
    Ok(base.join(file_name)?)
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(file_name)?;
        reqwest::get(url).await?.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = std::path::Path::new("./").join("assets").join(file_name);
        tokio::fs::read(&path)
            .await
            .map_err(|e| anyhow::anyhow!("reading {}: {}", path.display(), e))?
    };

    Ok(data)
}
