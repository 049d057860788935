//! Scene graph and hierarchical scene organization.
//!
//! The scene is a forest of [`SceneNode`] trait objects. Groups are
//! [`ContainerNode`]s, anything with geometry is a [`ModelNode`]. Every node has
//! a local transform relative to its parent and a cached world transform that is
//! refreshed by [`SceneNode::update_world_transforms`].
//!
//! Mesh nodes carry a [`Surface`] describing how they are shaded and whether they
//! take part in shadowing. Repainting a node only records a [`Paint`]; the GPU
//! material is built the next time the node writes its buffers, so the scene can
//! be edited from places that have no access to the device (e.g. load callbacks).

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        instance::Instance,
        model::{self, Material},
        texture::Texture,
    },
    render::Instanced,
    resources::texture::diffuse_normal_layout,
};

/// Which pipeline a mesh is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shading {
    /// Diffuse + ambient lighting with shadows.
    Lit,
    /// Plain texture colour, no lighting and no shadow lookup.
    Unlit,
}

/// A pending material change for a mesh node.
#[derive(Clone, Debug)]
pub enum Paint {
    /// Replace all materials with one opaque colour.
    Colour([f32; 3]),
    /// Keep normal maps, replace every diffuse texture.
    Texture(Texture),
}

/// Render settings of a mesh node.
#[derive(Clone, Debug)]
pub struct Surface {
    pub shading: Shading,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub paint: Option<Paint>,
}

impl Surface {
    pub fn new(shading: Shading) -> Self {
        Self {
            shading,
            cast_shadow: false,
            receive_shadow: false,
            paint: None,
        }
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(Shading::Lit)
    }
}

pub trait SceneNode {
    fn get_local_transform(&self) -> Instance;

    fn set_local_transform(&mut self, instance: Instance);

    fn update_local_transform(&mut self, mutation: &mut dyn FnMut(&mut Instance));

    fn get_world_transform(&self) -> Instance;

    /// Recomputes this node's world transform as `parent * local` and recurses.
    fn update_world_transforms(&mut self, parent: &Instance);

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>>;

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>>;

    fn add_child(&mut self, child: Box<dyn SceneNode>);

    /// `None` for nodes without geometry.
    fn surface(&self) -> Option<&Surface>;

    fn surface_mut(&mut self) -> Option<&mut Surface>;

    /// Applies pending paint and uploads the world transform.
    fn write_to_buffers(&mut self, queue: &wgpu::Queue, device: &wgpu::Device);

    fn get_render(&self) -> Vec<Instanced<'_>>;
}

/// Depth-first, parent before children.
pub fn traverse_mut(node: &mut dyn SceneNode, visit: &mut dyn FnMut(&mut dyn SceneNode)) {
    visit(node);
    for child in node.get_children_mut().iter_mut() {
        traverse_mut(child.as_mut(), visit);
    }
}

/// Depth-first, parent before children.
pub fn traverse(node: &dyn SceneNode, visit: &mut dyn FnMut(&dyn SceneNode)) {
    visit(node);
    for child in node.get_children().iter() {
        traverse(child.as_ref(), visit);
    }
}

/// Visits every node that has a [`Surface`].
pub fn for_each_surface_mut(node: &mut dyn SceneNode, visit: &mut dyn FnMut(&mut Surface)) {
    traverse_mut(node, &mut |node: &mut dyn SceneNode| {
        if let Some(surface) = node.surface_mut() {
            visit(surface);
        }
    });
}

pub struct ContainerNode {
    pub children: Vec<Box<dyn SceneNode>>,
    local: Instance,
    world: Instance,
}

impl ContainerNode {
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            local: Instance::default(),
            world: Instance::default(),
        }
    }

    pub fn with_children(children: Vec<Box<dyn SceneNode>>) -> Self {
        Self {
            children,
            ..Self::new()
        }
    }
}

impl Default for ContainerNode {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneNode for ContainerNode {
    fn get_local_transform(&self) -> Instance {
        self.local.clone()
    }

    fn set_local_transform(&mut self, instance: Instance) {
        self.local = instance;
    }

    fn update_local_transform(&mut self, mutation: &mut dyn FnMut(&mut Instance)) {
        mutation(&mut self.local);
    }

    fn get_world_transform(&self) -> Instance {
        self.world.clone()
    }

    fn update_world_transforms(&mut self, parent: &Instance) {
        self.world = parent * &self.local;
        for child in self.children.iter_mut() {
            child.update_world_transforms(&self.world);
        }
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }

    fn surface(&self) -> Option<&Surface> {
        None
    }

    fn surface_mut(&mut self) -> Option<&mut Surface> {
        None
    }

    fn write_to_buffers(&mut self, queue: &wgpu::Queue, device: &wgpu::Device) {
        self.children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(queue, device));
    }

    fn get_render(&self) -> Vec<Instanced<'_>> {
        self.children
            .iter()
            .flat_map(|child| child.get_render())
            .collect()
    }
}

pub struct ModelNode {
    children: Vec<Box<dyn SceneNode>>,
    instance_buffer: wgpu::Buffer,
    local: Instance,
    world: Instance,
    model: model::Model,
    pub surface: Surface,
}

impl ModelNode {
    pub fn from_model(device: &wgpu::Device, model: model::Model, surface: Surface) -> Self {
        let local = Instance::default();
        let world = Instance::default();
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Instance Buffer"),
            contents: bytemuck::cast_slice(&[world.to_raw(surface.receive_shadow)]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            children: vec![],
            instance_buffer,
            local,
            world,
            model,
            surface,
        }
    }

    fn apply_paint(&mut self, queue: &wgpu::Queue, device: &wgpu::Device) {
        let Some(paint) = self.surface.paint.take() else {
            return;
        };
        let layout = diffuse_normal_layout(device);
        match paint {
            Paint::Colour(rgb) => {
                let material = Material::from_colour(device, queue, "painted", rgb, &layout);
                self.model.replace_materials(material);
            }
            Paint::Texture(texture) => {
                if self.model.materials.is_empty() {
                    let normal = Texture::create_default_normal_map(1, 1, device, queue);
                    let material = Material::new(device, "textured", texture, normal, &layout);
                    self.model.replace_materials(material);
                } else {
                    self.model.materials = self
                        .model
                        .materials
                        .iter()
                        .map(|material| material.with_diffuse(device, texture.clone(), &layout))
                        .collect();
                }
            }
        }
    }
}

impl SceneNode for ModelNode {
    fn get_local_transform(&self) -> Instance {
        self.local.clone()
    }

    fn set_local_transform(&mut self, instance: Instance) {
        self.local = instance;
    }

    fn update_local_transform(&mut self, mutation: &mut dyn FnMut(&mut Instance)) {
        mutation(&mut self.local);
    }

    fn get_world_transform(&self) -> Instance {
        self.world.clone()
    }

    fn update_world_transforms(&mut self, parent: &Instance) {
        self.world = parent * &self.local;
        for child in self.children.iter_mut() {
            child.update_world_transforms(&self.world);
        }
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }

    fn surface(&self) -> Option<&Surface> {
        Some(&self.surface)
    }

    fn surface_mut(&mut self) -> Option<&mut Surface> {
        Some(&mut self.surface)
    }

    fn write_to_buffers(&mut self, queue: &wgpu::Queue, device: &wgpu::Device) {
        self.apply_paint(queue, device);
        let raw = self.world.to_raw(self.surface.receive_shadow);
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&[raw]));
        self.children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(queue, device));
    }

    fn get_render(&self) -> Vec<Instanced<'_>> {
        self.children
            .iter()
            .flat_map(|child| child.get_render())
            .chain([Instanced {
                instance: &self.instance_buffer,
                model: &self.model,
                amount: 1,
                shading: self.surface.shading,
                cast_shadow: self.surface.cast_shadow,
            }])
            .collect()
    }
}

/// Index of a root in the [`SceneGraph`]. Roots are only ever appended, so ids stay valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// The top level of the scene: an ordered list of roots.
#[derive(Default)]
pub struct SceneGraph {
    roots: Vec<Box<dyn SceneNode>>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, node: Box<dyn SceneNode>) -> NodeId {
        self.roots.push(node);
        NodeId(self.roots.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> Option<&dyn SceneNode> {
        self.roots.get(id.0).map(|node| node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut (dyn SceneNode + 'static)> {
        self.roots.get_mut(id.0).map(|node| node.as_mut())
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn roots(&self) -> impl Iterator<Item = &dyn SceneNode> {
        self.roots.iter().map(|node| node.as_ref())
    }

    pub fn update_world_transforms(&mut self) {
        let identity = Instance::default();
        self.roots
            .iter_mut()
            .for_each(|root| root.update_world_transforms(&identity));
    }

    pub fn write_to_buffers(&mut self, queue: &wgpu::Queue, device: &wgpu::Device) {
        self.update_world_transforms();
        self.roots
            .iter_mut()
            .for_each(|root| root.write_to_buffers(queue, device));
    }
}
