/**
 * This module contains all logic for creating and loading textures, from the
 * generated checkerboard to image files fetched from `assets/`.
 */
pub mod texture;
